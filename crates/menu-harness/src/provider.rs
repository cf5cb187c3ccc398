//! Provider interfaces.
//!
//! The engine never talks to a bus directly. It reads menus and action
//! groups through these traits; a host binds them to a live session bus,
//! and [`crate::mock`] binds them to in-memory state.

use crate::variant::Variant;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Attribute naming the action an item triggers
pub const ATTRIBUTE_ACTION: &str = "action";

/// Attribute holding the item's label
pub const ATTRIBUTE_LABEL: &str = "label";

/// Attribute holding the item's icon
pub const ATTRIBUTE_ICON: &str = "icon";

/// Attribute holding the activation target of radio items
pub const ATTRIBUTE_TARGET: &str = "target";

/// Attribute naming a custom widget type
pub const ATTRIBUTE_WIDGET: &str = "x-canonical-type";

/// Kind of link from an item to a nested menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Nested menu shown on demand
    Submenu,
    /// Inline group of items
    Section,
}

impl LinkKind {
    /// Link name as used by menu models
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submenu => "submenu",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live, possibly still populating, menu
pub trait MenuModel: fmt::Debug {
    /// Number of items currently known
    fn item_count(&self) -> usize;

    /// Value of attribute `name` on item `index`, if present
    fn item_attribute(&self, index: usize, name: &str) -> Option<Variant>;

    /// Names of every attribute set on item `index`
    fn item_attribute_names(&self, _index: usize) -> Vec<String> {
        Vec::new()
    }

    /// Nested menu linked from item `index`
    fn item_link(&self, index: usize, kind: LinkKind) -> Option<Rc<dyn MenuModel>>;

    /// Block until the provider reports new items or `timeout` elapses.
    ///
    /// Returns whether a change was observed.
    fn wait_for_change(&self, timeout: Duration) -> bool;

    /// Attribute value, only if it carries the type code `type_string`
    fn typed_attribute(&self, index: usize, name: &str, type_string: &str) -> Option<Variant> {
        self.item_attribute(index, name)
            .filter(|value| value.type_string() == type_string)
    }

    /// String attribute, or `None` when absent or not a string
    fn string_attribute(&self, index: usize, name: &str) -> Option<String> {
        match self.item_attribute(index, name) {
            Some(Variant::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Whether a provider confirmed a side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// The effect is visible to subsequent reads
    #[default]
    Applied,
    /// The effect was sent but may not be visible yet
    Pending,
}

/// A registry of named, optionally stateful actions
pub trait ActionGroup: fmt::Debug {
    /// Whether the group exports action `name`
    fn has_action(&self, name: &str) -> bool;

    /// Current state of action `name`; `None` for stateless or unknown actions
    fn action_state(&self, name: &str) -> Option<Variant>;

    /// Request a state change
    fn change_action_state(&self, name: &str, value: Variant) -> Dispatch;

    /// Activate action `name` with an optional parameter
    fn activate_action(&self, name: &str, parameter: Option<Variant>) -> Dispatch;
}

/// Resolves bus addresses to live menus and action groups
///
/// Resolution never fails. A service that is not up yet yields empty
/// handles that populate later.
pub trait MenuConnection {
    /// Menu exported by `bus_name` at `object_path`
    fn menu_model(&self, bus_name: &str, object_path: &str) -> Rc<dyn MenuModel>;

    /// Action group exported by `bus_name` at `object_path`
    fn action_group(&self, bus_name: &str, object_path: &str) -> Rc<dyn ActionGroup>;
}

/// Action groups by prefix, shared by every node of one match
pub type ActionGroups = BTreeMap<String, Rc<dyn ActionGroup>>;

/// Split a detailed action name into `(group prefix, local name)`
///
/// Splits on the first `.`; a name without one has an empty prefix.
#[must_use]
pub fn split_action(action: &str) -> (&str, &str) {
    action.split_once('.').unwrap_or(("", action))
}
