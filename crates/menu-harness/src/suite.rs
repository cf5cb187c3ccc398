//! Expectation suites loaded from YAML
//!
//! ```yaml
//! parameters:
//!   bus_name: com.canonical.indicator.sound
//!   actions:
//!     - name: indicator
//!       path: /com/canonical/indicator/sound
//!   menu_object_path: /com/canonical/indicator/sound/desktop
//! options:
//!   timeout_ms: 2000
//! items:
//!   - action: indicator.root
//!     link: submenu
//!     items:
//!       - type: checkbox
//!         toggled: true
//! ```

use crate::config::MatchOptions;
use crate::item_matcher::MenuItemMatcher;
use crate::match_result::MatchResult;
use crate::menu_matcher::{MenuMatcher, Parameters};
use crate::provider::MenuConnection;
use crate::result::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A menu address together with its expected top-level items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectationSuite {
    /// Menu under test
    pub parameters: Parameters,
    /// Timing overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MatchOptions>,
    /// Expected top-level items
    #[serde(default)]
    pub items: Vec<MenuItemMatcher>,
}

impl ExpectationSuite {
    /// Suite with no items
    #[must_use]
    pub const fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            options: None,
            items: Vec::new(),
        }
    }

    /// Append a top-level item
    #[must_use]
    pub fn item(mut self, item: MenuItemMatcher) -> Self {
        self.items.push(item);
        self
    }

    /// Parse and validate a suite
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        let suite: Self = serde_yaml_ng::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a suite from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> HarnessResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the menu address is usable
    pub fn validate(&self) -> HarnessResult<()> {
        let params = &self.parameters;
        if params.bus_name().is_empty() {
            return Err(HarnessError::expectation("bus_name must not be empty"));
        }
        if !params.menu_object_path().starts_with('/') {
            return Err(HarnessError::expectation(format!(
                "menu_object_path '{}' is not an object path",
                params.menu_object_path()
            )));
        }
        let mut names = BTreeSet::new();
        for group in params.actions() {
            if !names.insert(group.name.as_str()) {
                return Err(HarnessError::expectation(format!(
                    "action group '{}' is declared twice",
                    group.name
                )));
            }
        }
        Ok(())
    }

    /// Effective options: the suite's own, or defaults
    #[must_use]
    pub fn effective_options(&self) -> MatchOptions {
        self.options.unwrap_or_default()
    }

    /// Total number of item expectations, nested ones included
    #[must_use]
    pub fn expectation_count(&self) -> usize {
        self.items.iter().map(MenuItemMatcher::node_count).sum()
    }

    /// Resolve the menu through `connection`
    #[must_use]
    pub fn build(&self, connection: &dyn MenuConnection) -> MenuMatcher {
        self.items.iter().cloned().fold(
            MenuMatcher::new(self.parameters.clone(), connection)
                .with_options(self.effective_options()),
            MenuMatcher::item,
        )
    }

    /// Resolve and match in one go
    #[must_use]
    pub fn run(&self, connection: &dyn MenuConnection) -> MatchResult {
        self.build(connection).match_menu()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MenuSnapshot, MockActionGroup, MockBus, MockItem, MockMenu};

    const SUITE: &str = r"
parameters:
  bus_name: org.test
  actions:
    - name: indicator
      path: /org/test/actions
  menu_object_path: /org/test/menu
options:
  timeout_ms: 100
  item_wait_ms: 1
items:
  - action: indicator.root
    link: submenu
    items:
      - type: checkbox
        toggled: true
";

    fn bus(silent: bool) -> MockBus {
        let bus = MockBus::new();
        bus.export_menu(
            "org.test",
            "/org/test/menu",
            MockMenu::new(vec![MockItem::new()
                .action("indicator.root")
                .submenu(vec![MockItem::new().action("indicator.silent")])]),
        );
        bus.export_action_group(
            "org.test",
            "/org/test/actions",
            MockActionGroup::new()
                .action("root")
                .stateful_action("silent", silent),
        );
        bus
    }

    #[test]
    fn test_parse_suite() {
        let suite = ExpectationSuite::from_yaml(SUITE).unwrap();
        assert_eq!(suite.items.len(), 1);
        assert_eq!(suite.expectation_count(), 2);
        assert_eq!(suite.effective_options().timeout_ms, 100);
    }

    #[test]
    fn test_run_suite() {
        let suite = ExpectationSuite::from_yaml(SUITE).unwrap();
        assert!(suite.run(&bus(true)).success());

        let result = suite.run(&bus(false));
        assert!(result.concat_failures().contains("Expected toggled = true, but found false"));
    }

    #[test]
    fn test_run_against_snapshot() {
        let snapshot = MenuSnapshot::from_yaml(
            r"
bus_name: org.test
menu_path: /org/test/menu
action_groups:
  - path: /org/test/actions
    actions:
      root: {}
      silent: { state: { bool: true } }
items:
  - attributes:
      action: { string: indicator.root }
    submenu:
      - attributes:
          action: { string: indicator.silent }
",
        )
        .unwrap();
        let suite = ExpectationSuite::from_yaml(SUITE).unwrap();
        let result = suite.run(&snapshot.build_bus());
        assert!(result.success(), "{}", result.concat_failures());
    }

    #[test]
    fn test_rejects_duplicate_group_names() {
        let suite = ExpectationSuite::new(Parameters::new(
            "org.test",
            [("indicator", "/a"), ("indicator", "/b")],
            "/m",
        ));
        let err = suite.validate().unwrap_err();
        assert!(matches!(err, HarnessError::Expectation { .. }));
    }

    #[test]
    fn test_rejects_bad_menu_path() {
        let suite = ExpectationSuite::new(Parameters::new("org.test", Vec::<(String, String)>::new(), ""));
        assert!(suite.validate().is_err());
    }

    #[test]
    fn test_builder_and_yaml_output() {
        let suite = ExpectationSuite::new(Parameters::new("org.test", [("indicator", "/a")], "/m"))
            .item(MenuItemMatcher::new().label("Sound"));
        let yaml = suite.to_yaml().unwrap();
        assert!(yaml.contains("label: Sound"));
        assert!(!yaml.contains("options"));
    }

    #[test]
    fn test_build_applies_options() {
        let suite = ExpectationSuite::from_yaml(SUITE).unwrap();
        let matcher = suite.build(&bus(true));
        assert_eq!(matcher.options().item_wait_ms, 1);
        assert_eq!(matcher.items().len(), 1);
    }
}
