//! In-memory providers for driving the matcher without a session bus.
//!
//! [`MockMenu`], [`MockActionGroup`] and [`MockBus`] implement the provider
//! traits over shared `Rc<RefCell<..>>` state. Clones are handles onto the
//! same state, so a test can keep a handle and mutate a menu while the
//! matcher holds another.
//!
//! ## Example
//!
//! ```rust
//! use menu_harness::mock::{MockActionGroup, MockBus, MockItem};
//! use menu_harness::{MenuItemMatcher, MenuMatcher, Parameters, Variant};
//!
//! let bus = MockBus::new();
//! bus.menu("org.example", "/menu").append(
//!     MockItem::new()
//!         .action("indicator.root")
//!         .submenu(vec![MockItem::new().action("indicator.silent")]),
//! );
//! bus.export_action_group(
//!     "org.example",
//!     "/actions",
//!     MockActionGroup::new()
//!         .action("root")
//!         .stateful_action("silent", Variant::Bool(true)),
//! );
//!
//! let params = Parameters::new("org.example", [("indicator", "/actions")], "/menu");
//! let result = MenuMatcher::new(params, &bus)
//!     .item(
//!         MenuItemMatcher::new()
//!             .action("indicator.root")
//!             .submenu()
//!             .item(MenuItemMatcher::checkbox().toggled(true)),
//!     )
//!     .match_menu();
//! assert!(result.success(), "{}", result.concat_failures());
//! ```

pub mod actions;
pub mod bus;
pub mod menu;
pub mod snapshot;

pub use actions::{ActionEvent, MockActionGroup};
pub use bus::MockBus;
pub use menu::{MenuUpdate, MockItem, MockMenu};
pub use snapshot::{ActionGroupSnapshot, ActionSnapshot, ItemSnapshot, MenuSnapshot};
