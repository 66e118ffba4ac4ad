/// Read-only views over a [`UsageTree`], including zoomed "virtual roots".
///
/// A view is a tree reference plus a node index; zooming never copies a
/// subtree. The only thing a virtual root overrides is `own_size`, which it
/// reports as 0 so its total is exactly the sum of its children.
use super::usage_node::{NodeIndex, NodeKind, UsageNode};
use super::usage_tree::{Children, UsageTree};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug)]
pub struct UsageView<'a> {
    tree: &'a UsageTree,
    index: NodeIndex,
    is_virtual: bool,
}

impl<'a> UsageView<'a> {
    pub(crate) fn new(tree: &'a UsageTree, index: NodeIndex, is_virtual: bool) -> Self {
        Self {
            tree,
            index,
            is_virtual,
        }
    }

    pub fn tree(&self) -> &'a UsageTree {
        self.tree
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn node(&self) -> &'a UsageNode {
        self.tree.node(self.index)
    }

    /// `true` for views created by zooming.
    pub fn is_virtual_root(&self) -> bool {
        self.is_virtual
    }

    /// Absolute path of the viewed node (shared with the zoomed node).
    pub fn path(&self) -> PathBuf {
        self.tree.full_path(self.index)
    }

    pub fn name(&self) -> &'a str {
        self.node().name.as_str()
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    pub fn own_size(&self) -> u64 {
        if self.is_virtual {
            0
        } else {
            self.node().own_size
        }
    }

    /// `own_size() + Σ child.total_size()`.
    pub fn total_size(&self) -> u64 {
        let node = self.node();
        node.total_size() - node.own_size + self.own_size()
    }

    pub fn children(&self) -> Children<'a> {
        self.tree.children(self.index)
    }

    /// Children ordered for presentation (largest first, stable).
    pub fn sorted_children(&self) -> Vec<NodeIndex> {
        self.tree.children_sorted_by_size(self.index)
    }

    /// Plain view of one of this node's children.
    pub fn child(&self, index: NodeIndex) -> UsageView<'a> {
        debug_assert_eq!(self.tree.node(index).parent, Some(self.index));
        self.tree.view(index)
    }

    /// Drill in: a virtual root over this node's children.
    pub fn zoom(&self) -> UsageView<'a> {
        Self::new(self.tree, self.index, true)
    }
}
