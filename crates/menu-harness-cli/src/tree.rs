//! Menu Tree Visualization
//!
//! Walks a menu model and prints each item with its location, the index
//! path used in failure reports.
//!
//! ## Example Output
//!
//! ```text
//! org.test /org/test/menu
//! └── [0] action='indicator.root' label='Sound'
//!     └── submenu
//!         ├── [0 0] action='indicator.mute' label='Mute'
//!         └── [0 1] x-canonical-type='com.canonical.unity.slider'
//!
//! Total: 3 items, depth 2
//! ```

use menu_harness::provider::{MenuModel, ATTRIBUTE_ACTION, ATTRIBUTE_LABEL, ATTRIBUTE_WIDGET};
use menu_harness::{LinkKind, Location, Variant};
use std::collections::BTreeMap;

/// Item in the menu tree
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    /// Index path of the item
    pub location: Location,
    /// Attributes selected for display
    pub attributes: BTreeMap<String, Variant>,
    /// Followed links, submenu first
    pub links: Vec<MenuLink>,
}

/// Nested menu reached through a link
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLink {
    /// Link kind
    pub kind: LinkKind,
    /// Items of the nested menu
    pub items: Vec<MenuNode>,
}

impl MenuNode {
    /// Number of items in this subtree, this one included
    #[must_use]
    pub fn item_count(&self) -> usize {
        1 + self
            .links
            .iter()
            .flat_map(|link| &link.items)
            .map(MenuNode::item_count)
            .sum::<usize>()
    }

    /// Deepest location depth in this subtree
    #[must_use]
    pub fn depth(&self) -> usize {
        self.links
            .iter()
            .flat_map(|link| &link.items)
            .map(MenuNode::depth)
            .max()
            .unwrap_or_else(|| self.location.depth())
    }
}

/// Configuration for tree display
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Maximum nesting depth to follow (None = unlimited)
    pub max_depth: Option<usize>,
    /// Show every attribute rather than action, label and widget type
    pub show_attributes: bool,
}

impl TreeConfig {
    /// Set maximum depth
    #[must_use]
    pub const fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set whether to show every attribute
    #[must_use]
    pub const fn with_attributes(mut self, show: bool) -> Self {
        self.show_attributes = show;
        self
    }
}

/// Snapshot the items currently in `menu`
pub fn build_tree(menu: &dyn MenuModel, config: &TreeConfig) -> Vec<MenuNode> {
    build_items(menu, &Location::root(), config)
}

fn build_items(menu: &dyn MenuModel, parent: &Location, config: &TreeConfig) -> Vec<MenuNode> {
    (0..menu.item_count())
        .map(|index| {
            let location = parent.child(index);
            let names = if config.show_attributes {
                menu.item_attribute_names(index)
            } else {
                [ATTRIBUTE_ACTION, ATTRIBUTE_LABEL, ATTRIBUTE_WIDGET]
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            };
            let attributes = names
                .into_iter()
                .filter_map(|name| {
                    menu.item_attribute(index, &name)
                        .map(|value| (name, value))
                })
                .collect();
            let follow = config
                .max_depth
                .map_or(true, |max| location.depth() < max);
            let links = if follow {
                [LinkKind::Submenu, LinkKind::Section]
                    .into_iter()
                    .filter_map(|kind| {
                        menu.item_link(index, kind).map(|link| MenuLink {
                            kind,
                            items: build_items(&*link, &location, config),
                        })
                    })
                    .collect()
            } else {
                Vec::new()
            };
            MenuNode {
                location,
                attributes,
                links,
            }
        })
        .collect()
}

/// Render the tree to a string
#[must_use]
pub fn render_tree(title: &str, items: &[MenuNode]) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');

    render_items(items, "", &mut output);

    let total: usize = items.iter().map(MenuNode::item_count).sum();
    let depth = items.iter().map(MenuNode::depth).max().unwrap_or(0);
    output.push('\n');
    output.push_str(&format!("Total: {total} items, depth {depth}\n"));
    output
}

fn render_items(items: &[MenuNode], prefix: &str, output: &mut String) {
    for (i, item) in items.iter().enumerate() {
        let is_last = i + 1 == items.len();
        let (connector, extension) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        output.push_str(prefix);
        output.push_str(connector);
        output.push_str(&format!("[{}]", item.location));
        for (name, value) in &item.attributes {
            output.push_str(&format!(" {name}={value}"));
        }
        output.push('\n');

        let item_prefix = format!("{prefix}{extension}");
        for (j, link) in item.links.iter().enumerate() {
            let link_last = j + 1 == item.links.len();
            let (connector, extension) = if link_last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            output.push_str(&item_prefix);
            output.push_str(connector);
            output.push_str(link.kind.as_str());
            output.push('\n');
            render_items(&link.items, &format!("{item_prefix}{extension}"), output);
        }
    }
}
