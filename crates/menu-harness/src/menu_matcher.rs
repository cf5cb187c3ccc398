//! Top-level matching of an exported menu

use crate::config::MatchOptions;
use crate::item_matcher::{MatchContext, MenuItemMatcher};
use crate::match_result::{Location, MatchResult};
use crate::provider::{ActionGroups, MenuConnection, MenuModel};
use crate::wait::poll_until_match;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// An action group exported next to the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionGroupPath {
    /// Prefix used in detailed action names
    pub name: String,
    /// Object path of the group
    pub path: String,
}

/// Where to find the menu under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    bus_name: String,
    #[serde(default)]
    actions: Vec<ActionGroupPath>,
    menu_object_path: String,
}

impl Parameters {
    /// Describe a menu exported by `bus_name`
    pub fn new<I, N, P>(bus_name: impl Into<String>, actions: I, menu_object_path: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            bus_name: bus_name.into(),
            actions: actions
                .into_iter()
                .map(|(name, path)| ActionGroupPath {
                    name: name.into(),
                    path: path.into(),
                })
                .collect(),
            menu_object_path: menu_object_path.into(),
        }
    }

    /// Bus name exporting the menu
    #[must_use]
    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    /// Action groups in declaration order
    #[must_use]
    pub fn actions(&self) -> &[ActionGroupPath] {
        &self.actions
    }

    /// Object path of the root menu
    #[must_use]
    pub fn menu_object_path(&self) -> &str {
        &self.menu_object_path
    }
}

/// Matches an exported menu against a list of top-level expectations
///
/// The menu and action groups are resolved once, at construction.
pub struct MenuMatcher {
    parameters: Parameters,
    items: Vec<MenuItemMatcher>,
    menu: Rc<dyn MenuModel>,
    actions: ActionGroups,
    options: MatchOptions,
}

impl fmt::Debug for MenuMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuMatcher")
            .field("parameters", &self.parameters)
            .field("items_count", &self.items.len())
            .field("action_groups", &self.actions.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl MenuMatcher {
    /// Resolve the menu and action groups named by `parameters`
    ///
    /// When two groups share a name, the later one wins.
    pub fn new(parameters: Parameters, connection: &dyn MenuConnection) -> Self {
        let menu = connection.menu_model(&parameters.bus_name, &parameters.menu_object_path);
        let actions = parameters
            .actions
            .iter()
            .map(|group| {
                (
                    group.name.clone(),
                    connection.action_group(&parameters.bus_name, &group.path),
                )
            })
            .collect();
        debug!(
            bus_name = %parameters.bus_name,
            menu = %parameters.menu_object_path,
            groups = parameters.actions.len(),
            "resolved menu"
        );
        Self {
            parameters,
            items: Vec::new(),
            menu,
            actions,
            options: MatchOptions::default(),
        }
    }

    /// Replace the timing options
    #[must_use]
    pub const fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a top-level expectation
    #[must_use]
    pub fn item(mut self, item: MenuItemMatcher) -> Self {
        self.items.push(item);
        self
    }

    /// Parameters this matcher was built from
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Top-level expectations
    #[must_use]
    pub fn items(&self) -> &[MenuItemMatcher] {
        &self.items
    }

    /// Timing options
    #[must_use]
    pub const fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Match into a fresh result whose deadline is the configured timeout
    #[must_use]
    pub fn match_menu(&self) -> MatchResult {
        let mut result = MatchResult::with_timeout(self.options.timeout());
        self.match_into(&mut result);
        result
    }

    /// Match into `result`, polling the root menu until it matches or the
    /// deadline of `result` passes
    pub fn match_into(&self, result: &mut MatchResult) {
        let root = Location::root();
        let ctx = MatchContext::new(&self.actions).with_options(self.options);
        let outcome = poll_until_match(
            result,
            &*self.menu,
            self.options.item_wait(),
            &root,
            |attempt| {
                let count = self.menu.item_count();
                if count != self.items.len() {
                    attempt.failure(
                        &root,
                        format!(
                            "Row count mismatch, expected {} but found {count}",
                            self.items.len()
                        ),
                    );
                    return;
                }
                for (i, matcher) in self.items.iter().enumerate() {
                    matcher.match_item(attempt, &root, &*self.menu, &ctx, i);
                }
            },
        );
        info!(
            menu = %self.parameters.menu_object_path,
            matched = outcome.matched,
            attempts = outcome.attempts,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "menu match finished"
        );
    }
}
