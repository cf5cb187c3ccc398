//! Expectations for a single menu item and its subtree.
//!
//! A [`MenuItemMatcher`] is a plain value built with consuming builder calls
//! and nested with [`MenuItemMatcher::item`]. [`MenuItemMatcher::match_item`]
//! checks one live item against it, records every mismatch in a
//! [`MatchResult`], recurses into the linked children while polling for
//! them to arrive, and finally performs the configured side effects.
//!
//! ## Example
//!
//! ```rust
//! use menu_harness::{ItemType, MenuItemMatcher, Mode};
//!
//! let volume = MenuItemMatcher::new()
//!     .action("indicator.volume")
//!     .widget("com.canonical.unity.slider")
//!     .themed_icon("min-icon", ["audio-volume-low-zero-panel"])
//!     .pass_through_double_attribute("action", 0.5)
//!     .round_doubles(0.1);
//!
//! let root = MenuItemMatcher::new()
//!     .action("indicator.root")
//!     .mode(Mode::StartsWith)
//!     .submenu()
//!     .item(MenuItemMatcher::new().section().item(volume));
//!
//! assert_eq!(root.items().len(), 1);
//! assert_eq!(MenuItemMatcher::checkbox().expected_type(), ItemType::Checkbox);
//! ```

use crate::config::MatchOptions;
use crate::match_result::{Location, MatchResult};
use crate::provider::{
    split_action, ActionGroup, ActionGroups, LinkKind, MenuModel, ATTRIBUTE_ACTION,
    ATTRIBUTE_ICON, ATTRIBUTE_LABEL, ATTRIBUTE_TARGET, ATTRIBUTE_WIDGET,
};
use crate::variant::{Icon, Variant};
use crate::wait::{poll_until_match, settle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

// =============================================================================
// KINDS
// =============================================================================

/// Kind of item, derived from the state of its action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Stateless, or state that is neither boolean nor targeted
    #[default]
    Plain,
    /// Boolean action state
    Checkbox,
    /// Action state compared against the item's `target`
    Radio,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        })
    }
}

/// How expected children line up with live children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Same number of children, matched pairwise
    #[default]
    All,
    /// Expected children match the first live children
    StartsWith,
    /// Expected children match the last live children
    EndsWith,
}

/// Which link holds the expected children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Submenu if present, else section
    #[default]
    Any,
    /// Submenu only
    Submenu,
    /// Section only
    Section,
}

// =============================================================================
// EXPECTATION RECORDS
// =============================================================================

/// Expected fallback names of a themed icon attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemedIconExpectation {
    /// Attribute holding the icon
    pub attribute: String,
    /// Names in fallback order
    pub names: Vec<String>,
}

/// Expected value of a named attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeExpectation {
    /// Attribute name
    pub name: String,
    /// Expected value
    pub value: Variant,
}

/// An activation performed after the item matched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionRequest {
    /// Attribute naming the action; the item's own action when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Activation parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Variant>,
}

/// A state change performed after the item matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateRequest {
    /// Attribute naming the action; the item's own action when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// New state
    pub state: Variant,
}

// =============================================================================
// MATCH CONTEXT
// =============================================================================

/// Shared inputs of one match: the resolved action groups and the timings
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Action groups by prefix
    pub actions: &'a ActionGroups,
    /// Polling and settle timings
    pub options: MatchOptions,
}

impl<'a> MatchContext<'a> {
    /// Context with default timings
    #[must_use]
    pub fn new(actions: &'a ActionGroups) -> Self {
        Self {
            actions,
            options: MatchOptions::default(),
        }
    }

    /// Replace the timings
    #[must_use]
    pub const fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    fn group(&self, prefix: &str) -> Option<&'a Rc<dyn ActionGroup>> {
        self.actions.get(prefix)
    }
}

/// Why a side effect could not be dispatched
enum Unresolved {
    NoAction,
    NoGroup(String),
    UnknownAction(String),
}

// =============================================================================
// MENU ITEM MATCHER
// =============================================================================

/// Expectation for one menu item and, optionally, its linked children
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuItemMatcher {
    #[serde(rename = "type")]
    item_type: ItemType,
    mode: Mode,
    link: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    state_icons: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    themed_icons: Vec<ThemedIconExpectation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<AttributeExpectation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    not_set: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pass_through: Vec<AttributeExpectation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toggled: Option<bool>,
    round_doubles: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<MenuItemMatcher>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    set_states: Vec<StateRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    activations: Vec<ActionRequest>,
}

impl MenuItemMatcher {
    /// Expect a plain item with no further constraints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a checkbox item
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new().item_type(ItemType::Checkbox)
    }

    /// Expect a radio item
    #[must_use]
    pub fn radio() -> Self {
        Self::new().item_type(ItemType::Radio)
    }

    /// Set the expected item kind
    #[must_use]
    pub const fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Expect this label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Expect this detailed action name
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Expect the action state to carry these icon names
    #[must_use]
    pub fn state_icons<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_icons = names.into_iter().map(Into::into).collect();
        self
    }

    /// Expect this string `icon` attribute
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Expect `attribute` to hold a themed icon with exactly these names
    #[must_use]
    pub fn themed_icon<I, S>(mut self, attribute: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themed_icons.push(ThemedIconExpectation {
            attribute: attribute.into(),
            names: names.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Expect this custom widget type
    #[must_use]
    pub fn widget(self, widget: impl Into<String>) -> Self {
        self.string_attribute(ATTRIBUTE_WIDGET, widget)
    }

    /// Expect the action named by `attribute` to have this state
    #[must_use]
    pub fn pass_through_attribute(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<Variant>,
    ) -> Self {
        self.pass_through.push(AttributeExpectation {
            name: attribute.into(),
            value: value.into(),
        });
        self
    }

    /// Boolean [`pass_through_attribute`](Self::pass_through_attribute)
    #[must_use]
    pub fn pass_through_boolean_attribute(self, attribute: impl Into<String>, value: bool) -> Self {
        self.pass_through_attribute(attribute, value)
    }

    /// String [`pass_through_attribute`](Self::pass_through_attribute)
    #[must_use]
    pub fn pass_through_string_attribute(
        self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.pass_through_attribute(attribute, value.into())
    }

    /// Double [`pass_through_attribute`](Self::pass_through_attribute)
    #[must_use]
    pub fn pass_through_double_attribute(self, attribute: impl Into<String>, value: f64) -> Self {
        self.pass_through_attribute(attribute, value)
    }

    /// Accept pass-through doubles within this absolute difference
    #[must_use]
    pub const fn round_doubles(mut self, max_difference: f64) -> Self {
        self.round_doubles = max_difference;
        self
    }

    /// Expect the item attribute `name` to equal `value`
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Variant>) -> Self {
        self.attributes.push(AttributeExpectation {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Boolean [`attribute`](Self::attribute)
    #[must_use]
    pub fn boolean_attribute(self, name: impl Into<String>, value: bool) -> Self {
        self.attribute(name, value)
    }

    /// String [`attribute`](Self::attribute)
    #[must_use]
    pub fn string_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute(name, value.into())
    }

    /// Int32 [`attribute`](Self::attribute)
    #[must_use]
    pub fn int32_attribute(self, name: impl Into<String>, value: i32) -> Self {
        self.attribute(name, value)
    }

    /// Int64 [`attribute`](Self::attribute)
    #[must_use]
    pub fn int64_attribute(self, name: impl Into<String>, value: i64) -> Self {
        self.attribute(name, value)
    }

    /// Double [`attribute`](Self::attribute)
    #[must_use]
    pub fn double_attribute(self, name: impl Into<String>, value: f64) -> Self {
        self.attribute(name, value)
    }

    /// Expect the item to have no attribute `name`
    #[must_use]
    pub fn attribute_not_set(mut self, name: impl Into<String>) -> Self {
        self.not_set.push(name.into());
        self
    }

    /// Expect this toggle state
    #[must_use]
    pub const fn toggled(mut self, toggled: bool) -> Self {
        self.toggled = Some(toggled);
        self
    }

    /// Set how children line up
    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Look for children in the submenu only
    #[must_use]
    pub const fn submenu(mut self) -> Self {
        self.link = LinkType::Submenu;
        self
    }

    /// Look for children in the section only
    #[must_use]
    pub const fn section(mut self) -> Self {
        self.link = LinkType::Section;
        self
    }

    /// Expect a linked menu with no items
    #[must_use]
    pub const fn is_empty(self) -> Self {
        self.has_exactly(0)
    }

    /// Expect a linked menu with exactly `children` items
    #[must_use]
    pub const fn has_exactly(mut self, children: usize) -> Self {
        self.expected_size = Some(children);
        self
    }

    /// Append an expected child
    #[must_use]
    pub fn item(mut self, item: MenuItemMatcher) -> Self {
        self.items.push(item);
        self
    }

    /// Activate the item's action without a parameter
    #[must_use]
    pub fn activate(self) -> Self {
        self.push_activation(None, None)
    }

    /// Activate the item's action with `parameter`
    #[must_use]
    pub fn activate_with(self, parameter: impl Into<Variant>) -> Self {
        self.push_activation(None, Some(parameter.into()))
    }

    /// Activate the action named by `attribute`
    #[must_use]
    pub fn pass_through_activate(self, attribute: impl Into<String>) -> Self {
        self.push_activation(Some(attribute.into()), None)
    }

    /// Activate the action named by `attribute` with `parameter`
    #[must_use]
    pub fn pass_through_activate_with(
        self,
        attribute: impl Into<String>,
        parameter: impl Into<Variant>,
    ) -> Self {
        self.push_activation(Some(attribute.into()), Some(parameter.into()))
    }

    fn push_activation(mut self, attribute: Option<String>, parameter: Option<Variant>) -> Self {
        self.activations.push(ActionRequest {
            attribute,
            parameter,
        });
        self
    }

    /// Change the state of the item's action
    #[must_use]
    pub fn set_action_state(mut self, state: impl Into<Variant>) -> Self {
        self.set_states.push(StateRequest {
            attribute: None,
            state: state.into(),
        });
        self
    }

    /// Change the state of the action named by `attribute`
    #[must_use]
    pub fn set_pass_through_action_state(
        mut self,
        attribute: impl Into<String>,
        state: impl Into<Variant>,
    ) -> Self {
        self.set_states.push(StateRequest {
            attribute: Some(attribute.into()),
            state: state.into(),
        });
        self
    }

    /// Expected item kind
    #[must_use]
    pub const fn expected_type(&self) -> ItemType {
        self.item_type
    }

    /// Expected children
    #[must_use]
    pub fn items(&self) -> &[MenuItemMatcher] {
        &self.items
    }

    /// Expected number of linked children, if constrained
    #[must_use]
    pub const fn expected_size(&self) -> Option<usize> {
        self.expected_size
    }

    /// Number of matchers in this subtree, including this one
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.items.iter().map(Self::node_count).sum::<usize>()
    }

    // =========================================================================
    // MATCHING
    // =========================================================================

    /// Match item `index` of `menu` against this expectation.
    ///
    /// Failures are recorded at `parent` extended by `index`. Children are
    /// only visited while `result` has no failures at all.
    pub fn match_item(
        &self,
        result: &mut MatchResult,
        parent: &Location,
        menu: &dyn MenuModel,
        ctx: &MatchContext<'_>,
        index: usize,
    ) {
        let location = parent.child(index);
        trace!(%location, "matching item");

        let action = menu
            .string_attribute(index, ATTRIBUTE_ACTION)
            .unwrap_or_default();
        let state = if action.is_empty() {
            None
        } else {
            let (prefix, name) = split_action(&action);
            ctx.group(prefix).and_then(|group| group.action_state(name))
        };

        let (actual_type, is_toggled) = classify(menu, index, state.as_ref());
        if actual_type != self.item_type {
            result.failure(
                &location,
                format!("Expected {}, found {actual_type}", self.item_type),
            );
        }

        for expectation in &self.themed_icons {
            check_themed_icon(result, &location, menu, index, expectation);
        }

        let label = menu
            .string_attribute(index, ATTRIBUTE_LABEL)
            .unwrap_or_default();
        check_string(result, &location, "label", self.label.as_deref(), &label);
        let icon = menu
            .string_attribute(index, ATTRIBUTE_ICON)
            .unwrap_or_default();
        check_string(result, &location, "icon", self.icon.as_deref(), &icon);
        check_string(result, &location, "action", self.action.as_deref(), &action);

        if !self.state_icons.is_empty() {
            self.check_state_icons(result, &location, state.as_ref());
        }

        for expectation in &self.pass_through {
            self.check_pass_through(result, &location, menu, ctx, index, expectation);
        }

        for expectation in &self.attributes {
            check_attribute(result, &location, menu, index, expectation);
        }

        for name in &self.not_set {
            if menu.item_attribute(index, name).is_some() {
                result.failure(&location, format!("Not expected attribute '{name}' was found"));
            }
        }

        if let Some(expected) = self.toggled {
            if expected != is_toggled {
                result.failure(
                    &location,
                    format!("Expected toggled = {expected}, but found {is_toggled}"),
                );
            }
        }

        if !result.success() {
            return;
        }

        if !self.items.is_empty() || self.expected_size.is_some() {
            let Some(link) = self.resolve_link(menu, index) else {
                let expected = self.expected_size.unwrap_or(self.items.len());
                result.failure(
                    &location,
                    format!("Expected {expected} children, but found none"),
                );
                return;
            };

            poll_until_match(
                result,
                &*link,
                ctx.options.item_wait(),
                &location,
                |attempt| self.match_link(attempt, &location, &*link, ctx),
            );
        }

        for request in &self.set_states {
            match resolve_target(menu, index, ctx, request.attribute.as_deref(), &action) {
                Ok((group, name)) => {
                    debug!(%location, action = %name, state = %request.state, "setting action state");
                    let dispatch = group.change_action_state(&name, request.state.clone());
                    settle(menu, dispatch, ctx.options.settle());
                }
                Err(Unresolved::NoAction) => result.failure(
                    &location,
                    "Tried to set action state, but no action was found",
                ),
                Err(Unresolved::NoGroup(prefix)) => result.failure(
                    &location,
                    format!(
                        "Tried to set action state for action group '{prefix}', but action group wasn't found"
                    ),
                ),
                Err(Unresolved::UnknownAction(target)) => result.failure(
                    &location,
                    format!(
                        "Tried to set action state for action '{target}', but action was not found"
                    ),
                ),
            }
        }

        for request in &self.activations {
            match resolve_target(menu, index, ctx, request.attribute.as_deref(), &action) {
                Ok((group, name)) => {
                    debug!(%location, action = %name, parameter = ?request.parameter, "activating action");
                    let dispatch = group.activate_action(&name, request.parameter.clone());
                    settle(menu, dispatch, ctx.options.settle());
                }
                Err(Unresolved::NoAction) => result.failure(
                    &location,
                    "Tried to activate action, but no action was found",
                ),
                Err(Unresolved::NoGroup(prefix)) => result.failure(
                    &location,
                    format!(
                        "Tried to activate action group '{prefix}', but action group wasn't found"
                    ),
                ),
                Err(Unresolved::UnknownAction(target)) => result.failure(
                    &location,
                    format!("Tried to activate action '{target}', but action was not found"),
                ),
            }
        }
    }

    fn resolve_link(&self, menu: &dyn MenuModel, index: usize) -> Option<Rc<dyn MenuModel>> {
        match self.link {
            LinkType::Any => menu
                .item_link(index, LinkKind::Submenu)
                .or_else(|| menu.item_link(index, LinkKind::Section)),
            LinkType::Submenu => menu.item_link(index, LinkKind::Submenu),
            LinkType::Section => menu.item_link(index, LinkKind::Section),
        }
    }

    /// One attempt at matching the linked children
    fn match_link(
        &self,
        result: &mut MatchResult,
        location: &Location,
        link: &dyn MenuModel,
        ctx: &MatchContext<'_>,
    ) {
        let count = link.item_count();
        if let Some(size) = self.expected_size {
            if size != count {
                result.failure(
                    location,
                    format!("Expected {size} child items, but found {count}"),
                );
                return;
            }
        }
        if self.items.is_empty() {
            return;
        }

        let expected = self.items.len();
        let offset = match self.mode {
            Mode::All if expected != count => {
                result.failure(
                    location,
                    format!("Expected {expected} children, but found {count}"),
                );
                return;
            }
            Mode::StartsWith | Mode::EndsWith if expected > count => {
                result.failure(
                    location,
                    format!("Expected at least {expected} children, but found {count}"),
                );
                return;
            }
            Mode::All | Mode::StartsWith => 0,
            Mode::EndsWith => count - expected,
        };

        for (i, matcher) in self.items.iter().enumerate() {
            matcher.match_item(result, location, link, ctx, offset + i);
        }
    }

    fn check_state_icons(
        &self,
        result: &mut MatchResult,
        location: &Location,
        state: Option<&Variant>,
    ) {
        match state {
            None => result.failure(location, "Expected state icons but no state was found"),
            Some(Variant::Dict(map)) => {
                let actual = state_icon_names(map);
                if actual != self.state_icons {
                    result.failure(
                        location,
                        format!(
                            "Expected state_icons == {{{}}} but found {{{}}}",
                            self.state_icons.join(", "),
                            actual.join(", ")
                        ),
                    );
                }
            }
            Some(other) => result.failure(
                location,
                format!("Expected state icons vardict, found {}", other.type_string()),
            ),
        }
    }

    fn check_pass_through(
        &self,
        result: &mut MatchResult,
        location: &Location,
        menu: &dyn MenuModel,
        ctx: &MatchContext<'_>,
        index: usize,
        expectation: &AttributeExpectation,
    ) {
        let attribute = &expectation.name;
        let target = menu.string_attribute(index, attribute).unwrap_or_default();
        if target.is_empty() {
            result.failure(location, format!("Could not find action name '{attribute}'"));
            return;
        }

        let (prefix, name) = split_action(&target);
        let Some(group) = ctx.group(prefix) else {
            result.failure(
                location,
                format!("Could not find action group for ID '{prefix}'"),
            );
            return;
        };

        let expected = &expectation.value;
        match group.action_state(name) {
            None => result.failure(
                location,
                format!("Expected pass-through attribute '{attribute}' was not present"),
            ),
            Some(actual) if !actual.same_type(expected) => result.failure(
                location,
                format!(
                    "Expected pass-through attribute type '{}' but found '{}'",
                    expected.type_string(),
                    actual.type_string()
                ),
            ),
            Some(actual) if actual != *expected && !self.within_tolerance(expected, &actual) => {
                result.failure(
                    location,
                    format!(
                        "Expected pass-through attribute '{attribute}' == {expected} but found {actual}"
                    ),
                );
            }
            Some(_) => {}
        }
    }

    fn within_tolerance(&self, expected: &Variant, actual: &Variant) -> bool {
        match (expected, actual) {
            (Variant::Double(e), Variant::Double(a)) if self.round_doubles > 0.0 => {
                (a - e).abs() <= self.round_doubles
            }
            _ => false,
        }
    }
}

// =============================================================================
// CHECKS
// =============================================================================

fn classify(menu: &dyn MenuModel, index: usize, state: Option<&Variant>) -> (ItemType, bool) {
    let Some(state) = state else {
        return (ItemType::Plain, false);
    };
    if let Some(target) = menu.item_attribute(index, ATTRIBUTE_TARGET) {
        return (ItemType::Radio, *state == target);
    }
    match state.as_bool() {
        Some(toggled) => (ItemType::Checkbox, toggled),
        None => (ItemType::Plain, false),
    }
}

fn check_string(
    result: &mut MatchResult,
    location: &Location,
    field: &str,
    expected: Option<&str>,
    actual: &str,
) {
    if let Some(expected) = expected {
        if expected != actual {
            result.failure(
                location,
                format!("Expected {field} '{expected}', but found '{actual}'"),
            );
        }
    }
}

fn check_themed_icon(
    result: &mut MatchResult,
    location: &Location,
    menu: &dyn MenuModel,
    index: usize,
    expectation: &ThemedIconExpectation,
) {
    let attribute = &expectation.attribute;
    let Some(value) = menu.item_attribute(index, attribute) else {
        result.failure(
            location,
            format!("Expected themed icon {attribute} was not found"),
        );
        return;
    };
    let Some(Icon::Themed(names)) = Icon::from_variant(&value) else {
        result.failure(
            location,
            format!("Expected attribute {attribute} is not a themed icon"),
        );
        return;
    };

    if names.len() != expectation.names.len() {
        result.failure(
            location,
            format!(
                "Expected {} icons for themed icon [{attribute}], but {} were found.",
                expectation.names.len(),
                names.len()
            ),
        );
        return;
    }
    for (i, (expected, actual)) in expectation.names.iter().zip(&names).enumerate() {
        if expected != actual {
            result.failure(
                location,
                format!(
                    "Icon at position {i} for themed icon [{attribute}] mismatches. Expected: {expected} but found {actual}"
                ),
            );
        }
    }
}

fn check_attribute(
    result: &mut MatchResult,
    location: &Location,
    menu: &dyn MenuModel,
    index: usize,
    expectation: &AttributeExpectation,
) {
    let name = &expectation.name;
    let expected = &expectation.value;
    match menu.item_attribute(index, name) {
        None => result.failure(
            location,
            format!("Expected attribute '{name}' could not be found"),
        ),
        Some(actual) if !actual.same_type(expected) => result.failure(
            location,
            format!(
                "Expected attribute type '{}' but found '{}'",
                expected.type_string(),
                actual.type_string()
            ),
        ),
        Some(actual) if actual != *expected => result.failure(
            location,
            format!("Expected attribute '{name}' == {expected}, but found {actual}"),
        ),
        Some(_) => {}
    }
}

/// Icon names carried by an action state vardict
///
/// An `icons` list replaces any single `icon` entry. Only the first name of
/// each themed icon counts.
fn state_icon_names(state: &BTreeMap<String, Variant>) -> Vec<String> {
    let first_name = |value: &Variant| match Icon::from_variant(value) {
        Some(Icon::Themed(names)) => names.into_iter().next(),
        _ => None,
    };
    match (state.get("icons"), state.get("icon")) {
        (Some(Variant::Array(icons)), _) => icons.iter().filter_map(first_name).collect(),
        (_, Some(icon)) => first_name(icon).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn resolve_target<'a>(
    menu: &dyn MenuModel,
    index: usize,
    ctx: &MatchContext<'a>,
    attribute: Option<&str>,
    own_action: &str,
) -> Result<(&'a Rc<dyn ActionGroup>, String), Unresolved> {
    let target = match attribute {
        Some(attribute) => menu.string_attribute(index, attribute).unwrap_or_default(),
        None => own_action.to_string(),
    };
    if target.is_empty() {
        return Err(Unresolved::NoAction);
    }
    let (prefix, name) = split_action(&target);
    let group = ctx
        .group(prefix)
        .ok_or_else(|| Unresolved::NoGroup(prefix.to_string()))?;
    if !group.has_action(name) {
        return Err(Unresolved::UnknownAction(target.clone()));
    }
    Ok((group, name.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
