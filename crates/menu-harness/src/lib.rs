//! Menu Harness: declarative verification of live, asynchronously populated menus
//!
//! A menu exported over a session bus is an ordered tree of items, each with
//! typed attributes, optional submenu or section links and actions living in
//! separate action groups. This crate checks such a tree against an expected
//! one, waiting for the provider to finish populating it, performing
//! activations and state changes along the way, and reporting every mismatch
//! with the index path of the offending item.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Menu Harness                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐  │
//! │  │ MenuMatcher  │──►│ MenuItemMatcher  │──►│   MatchResult    │  │
//! │  │ (top level)  │   │ (per item, tree) │   │ (location → msgs)│  │
//! │  └──────┬───────┘   └────────┬─────────┘   └──────────────────┘  │
//! │         │                    │                                   │
//! │         ▼                    ▼                                   │
//! │  ┌────────────────────────────────────────┐                      │
//! │  │ MenuConnection / MenuModel / ActionGroup│◄── mock::MockBus    │
//! │  └────────────────────────────────────────┘                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use menu_harness::prelude::*;
//!
//! let bus = MockBus::new();
//! bus.menu("org.example.Sound", "/menu")
//!     .append(MockItem::new().action("indicator.mute").label("Mute"));
//! bus.export_action_group(
//!     "org.example.Sound",
//!     "/actions",
//!     MockActionGroup::new().stateful_action("mute", false),
//! );
//!
//! let result = MenuMatcher::new(
//!     Parameters::new("org.example.Sound", [("indicator", "/actions")], "/menu"),
//!     &bus,
//! )
//! .item(MenuItemMatcher::checkbox().label("Mute").toggled(false))
//! .match_menu();
//!
//! assert_match!(result);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod config;
mod item_matcher;
mod match_result;
mod menu_matcher;
mod result;
mod suite;

/// Provider traits binding the engine to a menu service
pub mod provider;

/// Typed attribute and state values
pub mod variant;

/// Polling helpers and default timings
pub mod wait;

/// In-memory providers for tests and recorded snapshots
pub mod mock;

pub use assertion::{expect_match, MatchFailure};
pub use config::{MatchOptions, ENV_ITEM_WAIT_MS, ENV_SETTLE_MS, ENV_TIMEOUT_MS};
pub use item_matcher::{
    ActionRequest, AttributeExpectation, ItemType, LinkType, MatchContext, MenuItemMatcher, Mode,
    StateRequest, ThemedIconExpectation,
};
pub use match_result::{FailureEntry, Location, MatchReport, MatchResult};
pub use menu_matcher::{ActionGroupPath, MenuMatcher, Parameters};
pub use provider::{
    split_action, ActionGroup, ActionGroups, Dispatch, LinkKind, MenuConnection, MenuModel,
};
pub use result::{HarnessError, HarnessResult};
pub use suite::ExpectationSuite;
pub use variant::{Icon, Variant};
pub use wait::{DEFAULT_ITEM_WAIT_MS, DEFAULT_MATCH_TIMEOUT_MS, DEFAULT_SETTLE_MS};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    pub use crate::assert_match;
    pub use super::config::*;
    pub use super::item_matcher::*;
    pub use super::match_result::*;
    pub use super::menu_matcher::*;
    pub use super::mock::{
        ActionEvent, MenuSnapshot, MenuUpdate, MockActionGroup, MockBus, MockItem, MockMenu,
    };
    pub use super::provider::*;
    pub use super::result::*;
    pub use super::suite::*;
    pub use super::variant::{Icon, Variant};
}
