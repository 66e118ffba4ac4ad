/// Arena-backed usage tree with incrementally maintained aggregate sizes.
///
/// All nodes live in a single `Vec<UsageNode>`. Relationships between nodes
/// use `NodeIndex` (a thin `u32` wrapper) rather than heap pointers. Every
/// node's `total_size` is kept equal to `own_size + Σ child.total_size` while
/// the tree is being built, so there is no separate aggregation pass and no
/// window in which a partially built tree reports inconsistent totals.
use super::usage_node::{NodeIndex, NodeKind, UsageNode};
use super::view::UsageView;
use compact_str::CompactString;
use std::cmp::Reverse;
use std::path::{Component, Path, PathBuf};

/// The complete tree produced by one scan.
#[derive(Debug, Clone)]
pub struct UsageTree {
    /// Arena: the root is always at index 0 and every child is stored after
    /// its parent (pre-order insertion).
    nodes: Vec<UsageNode>,

    /// Absolute path of the scanned root; node paths are rebuilt from it.
    root_path: PathBuf,

    /// Set when cancellation truncated at least one directory.
    partial: bool,
}

impl UsageTree {
    /// Create a tree containing only `root`, stored at index 0.
    pub fn new(root_path: PathBuf, root: UsageNode) -> Self {
        Self::with_capacity(root_path, root, 1)
    }

    /// Create a single-root tree with pre-allocated arena capacity.
    pub fn with_capacity(root_path: PathBuf, mut root: UsageNode, estimated_nodes: usize) -> Self {
        root.parent = None;
        let mut nodes = Vec::with_capacity(estimated_nodes.max(1));
        nodes.push(root);
        Self {
            nodes,
            root_path,
            partial: false,
        }
    }

    /// Create an empty directory root named after the last segment of `root_path`.
    pub fn new_dir_root(root_path: PathBuf) -> Self {
        let name = root_display_name(&root_path);
        Self::new(root_path, UsageNode::new_dir(name))
    }

    /// Index of the root node.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Absolute path of the scanned root.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Append `node` as the last child of `parent` and return its index.
    ///
    /// The new node's size and file count are added to every ancestor, so
    /// this is O(depth). Children keep insertion (discovery) order.
    pub fn add_child(&mut self, parent: NodeIndex, mut node: UsageNode) -> NodeIndex {
        debug_assert!(
            node.first_child.is_none(),
            "nodes must be attached before their own children"
        );
        let idx = NodeIndex::new(self.nodes.len());
        let size = node.total_size;
        let files = node.file_count;

        node.parent = Some(parent);
        node.next_sibling = None;
        self.nodes.push(node);

        match self.nodes[parent.idx()].last_child {
            Some(last) => self.nodes[last.idx()].next_sibling = Some(idx),
            None => self.nodes[parent.idx()].first_child = Some(idx),
        }
        self.nodes[parent.idx()].last_child = Some(idx);

        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            let n = &mut self.nodes[a.idx()];
            n.total_size += size;
            n.file_count += files;
            ancestor = n.parent;
        }

        idx
    }

    /// Re-tag a childless directory node as unreadable.
    pub(crate) fn mark_unreadable(&mut self, index: NodeIndex) {
        let node = &mut self.nodes[index.idx()];
        debug_assert!(!node.has_children(), "only childless directories can be unreadable");
        node.kind = NodeKind::Unreadable;
    }

    pub(crate) fn mark_partial(&mut self) {
        self.partial = true;
    }

    /// `true` if cancellation cut the scan short somewhere in this tree.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &UsageNode {
        &self.nodes[index.idx()]
    }

    /// Aggregate size of the whole tree.
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.nodes[0].total_size
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree holds at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in arena (pre-order) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &UsageNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex::new(i), n))
    }

    /// Direct children of `parent`, in discovery order.
    pub fn children(&self, parent: NodeIndex) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes[parent.idx()].first_child,
        }
    }

    /// Direct children sorted by total size, largest first.
    ///
    /// The sort is stable: equal sizes keep discovery order.
    pub fn children_sorted_by_size(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self.children(parent).collect();
        children.sort_by_key(|c| Reverse(self.nodes[c.idx()].total_size));
        children
    }

    /// Reconstruct the absolute path for a node by walking up to the root.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = index;
        while let Some(parent) = self.nodes[current.idx()].parent {
            segments.push(self.nodes[current.idx()].name.as_str());
            current = parent;
        }

        let mut path = self.root_path.clone();
        for segment in segments.into_iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Depth of a node below the root (root = 0).
    pub fn depth(&self, index: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[index.idx()].parent;
        while let Some(p) = current {
            depth += 1;
            current = self.nodes[p.idx()].parent;
        }
        depth
    }

    /// Resolve a path (absolute, or relative to the root) to a node.
    pub fn find(&self, path: &Path) -> Option<NodeIndex> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root_path).ok()?
        } else {
            path
        };

        let mut current = self.root();
        for component in relative.components() {
            match component {
                Component::CurDir => continue,
                Component::Normal(segment) => {
                    let segment = segment.to_string_lossy();
                    current = self
                        .children(current)
                        .find(|c| self.nodes[c.idx()].name.as_str() == segment)?;
                }
                _ => return None,
            }
        }
        Some(current)
    }

    /// Borrowed view of a node, reporting its own size as stored.
    pub fn view(&self, index: NodeIndex) -> UsageView<'_> {
        UsageView::new(self, index, false)
    }

    /// Zoomed view: same children by reference, `own_size` forced to 0.
    pub fn virtual_root(&self, index: NodeIndex) -> UsageView<'_> {
        UsageView::new(self, index, true)
    }
}

/// Iterator over a node's children in discovery order.
pub struct Children<'a> {
    tree: &'a UsageTree,
    next: Option<NodeIndex>,
}

impl Iterator for Children<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        self.next = self.tree.nodes[current.idx()].next_sibling;
        Some(current)
    }
}

/// Derive a display name for a scan root: its last segment, or the whole
/// path for roots such as `/` or `C:\` that have none.
pub fn root_display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
