//! Recorded menus loaded from YAML
//!
//! ```yaml
//! bus_name: com.canonical.indicator.sound
//! menu_path: /com/canonical/indicator/sound/desktop
//! action_groups:
//!   - path: /com/canonical/indicator/sound
//!     actions:
//!       root: {}
//!       silent-mode:
//!         state: { bool: false }
//! items:
//!   - attributes:
//!       action: { string: indicator.root }
//!     submenu:
//!       - attributes:
//!           action: { string: indicator.silent-mode }
//!           label: { string: Silent Mode }
//! ```

use super::actions::MockActionGroup;
use super::bus::MockBus;
use super::menu::{MockItem, MockMenu};
use crate::result::{HarnessError, HarnessResult};
use crate::variant::Variant;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A recorded menu tree with its action groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuSnapshot {
    /// Bus name exporting the menu
    pub bus_name: String,
    /// Object path of the root menu
    pub menu_path: String,
    /// Exported action groups
    #[serde(default)]
    pub action_groups: Vec<ActionGroupSnapshot>,
    /// Top-level items
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
}

/// One exported action group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionGroupSnapshot {
    /// Object path of the group
    pub path: String,
    /// Actions by local name
    #[serde(default)]
    pub actions: BTreeMap<String, ActionSnapshot>,
}

/// One action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSnapshot {
    /// Current state, absent for stateless actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Variant>,
}

/// One menu item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSnapshot {
    /// Attributes by name
    #[serde(default)]
    pub attributes: BTreeMap<String, Variant>,
    /// Items of the linked submenu
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<Vec<ItemSnapshot>>,
    /// Items of the linked section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Vec<ItemSnapshot>>,
}

impl ItemSnapshot {
    fn to_mock(&self) -> MockItem {
        let mut item = self
            .attributes
            .iter()
            .fold(MockItem::new(), |item, (name, value)| {
                item.attribute(name.clone(), value.clone())
            });
        if let Some(children) = &self.submenu {
            item = item.submenu(children.iter().map(Self::to_mock).collect());
        }
        if let Some(children) = &self.section {
            item = item.section(children.iter().map(Self::to_mock).collect());
        }
        item
    }
}

impl MenuSnapshot {
    /// Parse a snapshot from YAML
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        let snapshot: Self = serde_yaml_ng::from_str(yaml)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load a snapshot from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Check addresses are usable
    pub fn validate(&self) -> HarnessResult<()> {
        if self.bus_name.is_empty() {
            return Err(HarnessError::fixture("bus_name must not be empty"));
        }
        if !self.menu_path.starts_with('/') {
            return Err(HarnessError::fixture(format!(
                "menu_path '{}' is not an object path",
                self.menu_path
            )));
        }
        let mut seen = BTreeSet::new();
        for group in &self.action_groups {
            if !group.path.starts_with('/') {
                return Err(HarnessError::fixture(format!(
                    "action group path '{}' is not an object path",
                    group.path
                )));
            }
            if !seen.insert(group.path.as_str()) {
                return Err(HarnessError::fixture(format!(
                    "action group path '{}' is exported twice",
                    group.path
                )));
            }
        }
        Ok(())
    }

    /// Root menu as a mock
    #[must_use]
    pub fn to_menu(&self) -> MockMenu {
        MockMenu::new(self.items.iter().map(ItemSnapshot::to_mock).collect())
    }

    /// Export the menu and every action group on a fresh bus
    #[must_use]
    pub fn build_bus(&self) -> MockBus {
        let bus = MockBus::new();
        bus.export_menu(&self.bus_name, &self.menu_path, self.to_menu());
        for group in &self.action_groups {
            let mock = MockActionGroup::new();
            for (name, action) in &group.actions {
                mock.insert(name, action.state.clone());
            }
            bus.export_action_group(&self.bus_name, &group.path, mock);
        }
        bus
    }
}
