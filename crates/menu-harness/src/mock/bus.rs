//! Mock session bus

use super::actions::MockActionGroup;
use super::menu::MockMenu;
use crate::provider::{ActionGroup, MenuConnection, MenuModel};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

type Address = (String, String);

#[derive(Debug, Default)]
struct BusState {
    menus: BTreeMap<Address, MockMenu>,
    groups: BTreeMap<Address, MockActionGroup>,
}

/// In-memory registry of exported menus and action groups
///
/// Looking up an address nobody exported yields an empty object that is
/// registered at that address, so a test can populate it after the
/// matcher has resolved it.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

fn address(bus_name: &str, object_path: &str) -> Address {
    (bus_name.to_string(), object_path.to_string())
}

impl MockBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `menu` at the given address, replacing any previous export
    pub fn export_menu(&self, bus_name: &str, object_path: &str, menu: MockMenu) {
        self.state
            .borrow_mut()
            .menus
            .insert(address(bus_name, object_path), menu);
    }

    /// Export `group` at the given address, replacing any previous export
    pub fn export_action_group(&self, bus_name: &str, object_path: &str, group: MockActionGroup) {
        self.state
            .borrow_mut()
            .groups
            .insert(address(bus_name, object_path), group);
    }

    /// Menu handle at the given address, created empty if absent
    pub fn menu(&self, bus_name: &str, object_path: &str) -> MockMenu {
        self.state
            .borrow_mut()
            .menus
            .entry(address(bus_name, object_path))
            .or_default()
            .clone()
    }

    /// Action group handle at the given address, created empty if absent
    pub fn action_group(&self, bus_name: &str, object_path: &str) -> MockActionGroup {
        self.state
            .borrow_mut()
            .groups
            .entry(address(bus_name, object_path))
            .or_default()
            .clone()
    }

    /// Object paths exporting a menu on `bus_name`
    #[must_use]
    pub fn menu_paths(&self, bus_name: &str) -> Vec<String> {
        self.state
            .borrow()
            .menus
            .keys()
            .filter(|(bus, _)| bus == bus_name)
            .map(|(_, path)| path.clone())
            .collect()
    }
}

impl MenuConnection for MockBus {
    fn menu_model(&self, bus_name: &str, object_path: &str) -> Rc<dyn MenuModel> {
        debug!(bus_name, object_path, "resolving menu");
        Rc::new(self.menu(bus_name, object_path))
    }

    fn action_group(&self, bus_name: &str, object_path: &str) -> Rc<dyn ActionGroup> {
        debug!(bus_name, object_path, "resolving action group");
        Rc::new(MockBus::action_group(self, bus_name, object_path))
    }
}
