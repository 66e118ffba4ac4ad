/// Per-folder breakdown: the direct children of a folder with their share
/// of its total, largest first.
use crate::model::{NodeIndex, UsageView};

/// One row of a folder breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRow {
    pub index: NodeIndex,
    pub name: String,
    pub size: u64,
    /// Percentage of the folder's total (0.0–100.0).
    pub percent: f64,
}

/// `size` as a percentage of `total`; 0 when `total` is 0.
pub fn percentage(size: u64, total: u64) -> f64 {
    if total > 0 {
        size as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Direct children of `view`, sorted by size descending (stable).
pub fn breakdown(view: UsageView<'_>) -> Vec<ShareRow> {
    let tree = view.tree();
    let total = view.total_size();
    view.sorted_children()
        .into_iter()
        .map(|index| {
            let node = tree.node(index);
            ShareRow {
                index,
                name: node.name.to_string(),
                size: node.total_size(),
                percent: percentage(node.total_size(), total),
            }
        })
        .collect()
}
