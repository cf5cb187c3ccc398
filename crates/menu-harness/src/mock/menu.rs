//! Mock menu model with simulated asynchronous population

use crate::provider::{
    LinkKind, MenuModel, ATTRIBUTE_ACTION, ATTRIBUTE_ICON, ATTRIBUTE_LABEL, ATTRIBUTE_TARGET,
    ATTRIBUTE_WIDGET,
};
use crate::variant::{Icon, Variant};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// One item of a [`MockMenu`]
#[derive(Debug, Clone, Default)]
pub struct MockItem {
    attributes: BTreeMap<String, Variant>,
    submenu: Option<MockMenu>,
    section: Option<MockMenu>,
}

impl MockItem {
    /// Create an item with no attributes or links
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Variant>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the `action` attribute
    #[must_use]
    pub fn action(self, action: &str) -> Self {
        self.attribute(ATTRIBUTE_ACTION, action)
    }

    /// Set the `label` attribute
    #[must_use]
    pub fn label(self, label: &str) -> Self {
        self.attribute(ATTRIBUTE_LABEL, label)
    }

    /// Set the `icon` attribute
    #[must_use]
    pub fn icon(self, icon: Icon) -> Self {
        self.attribute(ATTRIBUTE_ICON, icon)
    }

    /// Set the `target` attribute, making the item a radio item
    #[must_use]
    pub fn target(self, target: impl Into<Variant>) -> Self {
        self.attribute(ATTRIBUTE_TARGET, target)
    }

    /// Set the custom widget type
    #[must_use]
    pub fn widget(self, widget: &str) -> Self {
        self.attribute(ATTRIBUTE_WIDGET, widget)
    }

    /// Link a submenu holding `items`
    #[must_use]
    pub fn submenu(self, items: Vec<MockItem>) -> Self {
        self.submenu_menu(MockMenu::new(items))
    }

    /// Link an existing menu handle as submenu
    #[must_use]
    pub fn submenu_menu(mut self, menu: MockMenu) -> Self {
        self.submenu = Some(menu);
        self
    }

    /// Link a section holding `items`
    #[must_use]
    pub fn section(self, items: Vec<MockItem>) -> Self {
        self.section_menu(MockMenu::new(items))
    }

    /// Link an existing menu handle as section
    #[must_use]
    pub fn section_menu(mut self, menu: MockMenu) -> Self {
        self.section = Some(menu);
        self
    }

    /// Attribute value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.attributes.get(name)
    }

    /// Linked menu of the given kind
    #[must_use]
    pub fn link(&self, kind: LinkKind) -> Option<&MockMenu> {
        match kind {
            LinkKind::Submenu => self.submenu.as_ref(),
            LinkKind::Section => self.section.as_ref(),
        }
    }
}

/// A change applied to a [`MockMenu`] when the matcher waits on it
#[derive(Debug, Clone)]
pub enum MenuUpdate {
    /// Add an item at the end
    Append(MockItem),
    /// Insert an item before `index`
    Insert(usize, MockItem),
    /// Remove the item at `index`
    Remove(usize),
    /// Replace the item at `index`
    Replace(usize, MockItem),
    /// Set or clear one attribute of an existing item
    SetAttribute {
        /// Item index
        index: usize,
        /// Attribute name
        name: String,
        /// New value, `None` to unset
        value: Option<Variant>,
    },
}

#[derive(Debug, Default)]
struct MenuState {
    items: Vec<MockItem>,
    pending: VecDeque<Vec<MenuUpdate>>,
    changes: usize,
}

impl MenuState {
    fn apply(&mut self, update: MenuUpdate) {
        match update {
            MenuUpdate::Append(item) => self.items.push(item),
            MenuUpdate::Insert(index, item) => {
                let index = index.min(self.items.len());
                self.items.insert(index, item);
            }
            MenuUpdate::Remove(index) => {
                if index < self.items.len() {
                    self.items.remove(index);
                }
            }
            MenuUpdate::Replace(index, item) => {
                if let Some(slot) = self.items.get_mut(index) {
                    *slot = item;
                }
            }
            MenuUpdate::SetAttribute { index, name, value } => {
                if let Some(item) = self.items.get_mut(index) {
                    match value {
                        Some(value) => {
                            item.attributes.insert(name, value);
                        }
                        None => {
                            item.attributes.remove(&name);
                        }
                    }
                }
            }
        }
        self.changes += 1;
    }
}

/// In-memory menu model
///
/// Updates queued with [`MockMenu::schedule`] stay invisible until the
/// next [`MenuModel::wait_for_change`], which applies one batch. With
/// nothing queued, waiting sleeps for the full timeout.
#[derive(Debug, Clone, Default)]
pub struct MockMenu {
    state: Rc<RefCell<MenuState>>,
}

impl MockMenu {
    /// Create a menu with the given items
    #[must_use]
    pub fn new(items: Vec<MockItem>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MenuState {
                items,
                ..MenuState::default()
            })),
        }
    }

    /// Create an empty menu
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an item immediately
    pub fn append(&self, item: MockItem) {
        self.update(MenuUpdate::Append(item));
    }

    /// Apply an update immediately
    pub fn update(&self, update: MenuUpdate) {
        self.state.borrow_mut().apply(update);
    }

    /// Queue a single update for the next wait
    pub fn schedule(&self, update: MenuUpdate) {
        self.schedule_batch(vec![update]);
    }

    /// Queue a batch of updates applied together on one wait
    pub fn schedule_batch(&self, updates: Vec<MenuUpdate>) {
        self.state.borrow_mut().pending.push_back(updates);
    }

    /// Number of queued batches
    #[must_use]
    pub fn pending_updates(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Number of updates applied so far
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.state.borrow().changes
    }

    /// Copy of the item at `index`
    #[must_use]
    pub fn item(&self, index: usize) -> Option<MockItem> {
        self.state.borrow().items.get(index).cloned()
    }

    /// Whether both handles share the same state
    #[must_use]
    pub fn same_menu(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl MenuModel for MockMenu {
    fn item_count(&self) -> usize {
        self.state.borrow().items.len()
    }

    fn item_attribute(&self, index: usize, name: &str) -> Option<Variant> {
        self.state
            .borrow()
            .items
            .get(index)
            .and_then(|item| item.attributes.get(name).cloned())
    }

    fn item_attribute_names(&self, index: usize) -> Vec<String> {
        self.state
            .borrow()
            .items
            .get(index)
            .map(|item| item.attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn item_link(&self, index: usize, kind: LinkKind) -> Option<Rc<dyn MenuModel>> {
        let state = self.state.borrow();
        let menu = state.items.get(index)?.link(kind)?.clone();
        Some(Rc::new(menu))
    }

    fn wait_for_change(&self, timeout: Duration) -> bool {
        let batch = self.state.borrow_mut().pending.pop_front();
        match batch {
            Some(updates) => {
                trace!(updates = updates.len(), "applying queued menu updates");
                let mut state = self.state.borrow_mut();
                for update in updates {
                    state.apply(update);
                }
                true
            }
            None => {
                std::thread::sleep(timeout);
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn short() -> Duration {
        Duration::from_millis(1)
    }

    mod item_tests {
        use super::*;

        #[test]
        fn test_builder_attributes() {
            let item = MockItem::new()
                .label("Mute")
                .action("indicator.mute")
                .widget("com.canonical.unity.slider");
            assert_eq!(item.get(ATTRIBUTE_LABEL), Some(&Variant::from("Mute")));
            assert_eq!(
                item.get(ATTRIBUTE_WIDGET),
                Some(&Variant::from("com.canonical.unity.slider"))
            );
        }

        #[test]
        fn test_links() {
            let item = MockItem::new()
                .submenu(vec![MockItem::new()])
                .section(vec![MockItem::new(), MockItem::new()]);
            assert_eq!(item.link(LinkKind::Submenu).unwrap().item_count(), 1);
            assert_eq!(item.link(LinkKind::Section).unwrap().item_count(), 2);
        }
    }

    mod model_tests {
        use super::*;

        #[test]
        fn test_attribute_lookup() {
            let menu = MockMenu::new(vec![MockItem::new().label("Sound")]);
            assert_eq!(menu.item_count(), 1);
            assert_eq!(
                menu.item_attribute(0, ATTRIBUTE_LABEL),
                Some(Variant::from("Sound"))
            );
            assert!(menu.item_attribute(0, ATTRIBUTE_ICON).is_none());
            assert!(menu.item_attribute(1, ATTRIBUTE_LABEL).is_none());
            assert_eq!(menu.item_attribute_names(0), vec!["label".to_string()]);
        }

        #[test]
        fn test_link_shares_state() {
            let sub = MockMenu::empty();
            let menu = MockMenu::new(vec![MockItem::new().submenu_menu(sub.clone())]);
            let link = menu.item_link(0, LinkKind::Submenu).unwrap();
            assert_eq!(link.item_count(), 0);
            sub.append(MockItem::new());
            assert_eq!(link.item_count(), 1);
            assert!(menu.item_link(0, LinkKind::Section).is_none());
        }

        #[test]
        fn test_clones_share_state() {
            let menu = MockMenu::empty();
            let handle = menu.clone();
            handle.append(MockItem::new());
            assert_eq!(menu.item_count(), 1);
            assert!(menu.same_menu(&handle));
            assert!(!menu.same_menu(&MockMenu::empty()));
        }
    }

    mod update_tests {
        use super::*;

        #[test]
        fn test_scheduled_updates_wait_for_change() {
            let menu = MockMenu::empty();
            menu.schedule_batch(vec![
                MenuUpdate::Append(MockItem::new().label("a")),
                MenuUpdate::Append(MockItem::new().label("b")),
            ]);
            assert_eq!(menu.item_count(), 0);
            assert!(menu.wait_for_change(short()));
            assert_eq!(menu.item_count(), 2);
            assert_eq!(menu.change_count(), 2);
            assert!(!menu.wait_for_change(short()));
        }

        #[test]
        fn test_insert_remove_replace() {
            let menu = MockMenu::new(vec![MockItem::new().label("a"), MockItem::new().label("c")]);
            menu.update(MenuUpdate::Insert(1, MockItem::new().label("b")));
            assert_eq!(menu.string_attribute(1, ATTRIBUTE_LABEL).as_deref(), Some("b"));
            menu.update(MenuUpdate::Replace(0, MockItem::new().label("z")));
            assert_eq!(menu.string_attribute(0, ATTRIBUTE_LABEL).as_deref(), Some("z"));
            menu.update(MenuUpdate::Remove(2));
            assert_eq!(menu.item_count(), 2);
            menu.update(MenuUpdate::Remove(9));
            assert_eq!(menu.item_count(), 2);
        }

        #[test]
        fn test_set_and_clear_attribute() {
            let menu = MockMenu::new(vec![MockItem::new()]);
            menu.update(MenuUpdate::SetAttribute {
                index: 0,
                name: "x".into(),
                value: Some(Variant::Int32(3)),
            });
            assert_eq!(menu.item_attribute(0, "x"), Some(Variant::Int32(3)));
            menu.update(MenuUpdate::SetAttribute {
                index: 0,
                name: "x".into(),
                value: None,
            });
            assert!(menu.item_attribute(0, "x").is_none());
        }
    }
}
