/// A single node in the arena-allocated usage tree.
///
/// Nodes are stored in a flat `Vec<UsageNode>` owned by [`UsageTree`].
/// Parent-child relationships use indices rather than pointers, so a
/// zoomed "virtual root" is just another index into the same arena.
///
/// [`UsageTree`]: super::UsageTree
use compact_str::CompactString;
use serde::Serialize;

/// Lightweight index into the arena `Vec<UsageNode>`.
///
/// Uses `u32` to keep nodes small; supports up to ~4 billion nodes,
/// which is more than enough for any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node stands for on disk.
///
/// Directories and unreadable directories are both childless-capable and
/// both carry `own_size == 0`; the tag is the only way to tell an empty
/// folder from one that could not be listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A regular file; `own_size` is its length in bytes.
    File,
    /// A directory that was listed (possibly empty, possibly truncated by cancellation).
    Directory,
    /// A directory whose listing failed (permission denied, I/O error).
    Unreadable,
}

/// A single file or directory in the tree.
#[derive(Debug, Clone)]
pub struct UsageNode {
    /// Final path segment only (NOT the full path).
    /// Full paths are reconstructed on demand by walking up via `parent`.
    pub name: CompactString,

    /// Bytes attributable to this entry alone: the file length for files,
    /// always 0 for directories.
    pub own_size: u64,

    pub kind: NodeKind,

    /// Index of the parent node. `None` for the scan root.
    pub parent: Option<NodeIndex>,

    /// First child in discovery order.
    pub first_child: Option<NodeIndex>,

    /// Last child, kept so appends stay O(1) and preserve discovery order.
    pub last_child: Option<NodeIndex>,

    /// Next sibling under the same parent.
    pub next_sibling: Option<NodeIndex>,

    /// `own_size` plus the total of every descendant.
    ///
    /// Maintained by [`UsageTree::add_child`](super::UsageTree::add_child),
    /// which pushes each new node's size up the ancestor chain.
    pub(crate) total_size: u64,

    /// Number of descendant *files* (a file counts itself).
    pub(crate) file_count: u64,
}

impl UsageNode {
    /// Create a new file node with the given name and size.
    pub fn new_file(name: CompactString, size: u64) -> Self {
        Self::with_kind(name, size, NodeKind::File)
    }

    /// Create a new (so far empty) directory node.
    pub fn new_dir(name: CompactString) -> Self {
        Self::with_kind(name, 0, NodeKind::Directory)
    }

    /// Create a placeholder for a directory that could not be listed.
    pub fn new_unreadable(name: CompactString) -> Self {
        Self::with_kind(name, 0, NodeKind::Unreadable)
    }

    fn with_kind(name: CompactString, own_size: u64, kind: NodeKind) -> Self {
        Self {
            name,
            own_size,
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            total_size: own_size,
            file_count: u64::from(kind == NodeKind::File),
        }
    }

    /// Aggregate size: `own_size + Σ child.total_size()`.
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of files at or below this node.
    #[inline]
    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    /// `true` if the node has at least one child.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory | NodeKind::Unreadable)
    }
}
