/// Data model for the SpaceMap usage tree.
///
/// Re-exports the arena-allocated tree, its views, and size formatting.
pub mod size;
pub mod usage_node;
pub mod usage_tree;
pub mod view;

pub use usage_node::{NodeIndex, NodeKind, UsageNode};
pub use usage_tree::{root_display_name, Children, UsageTree};
pub use view::UsageView;
