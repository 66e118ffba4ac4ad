/// Indented outline of a subtree, the way a tree view would show it fully
/// expanded down to a depth limit: pre-order, siblings largest first,
/// every size given as a share of the outline root.
use super::breakdown::percentage;
use crate::model::{NodeIndex, UsageView};

/// Hard cap on outline rows so fully expanded multi-million-node trees do
/// not allocate unbounded memory.
pub const MAX_OUTLINE_ROWS: usize = 500_000;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub index: NodeIndex,
    /// Nesting depth below the outline root (root = 0).
    pub depth: u16,
    pub size: u64,
    /// Percentage of the outline root's total.
    pub percent: f64,
}

/// Rows for `view` and its descendants down to `max_depth` levels.
pub fn outline(view: UsageView<'_>, max_depth: u16) -> Vec<OutlineRow> {
    let tree = view.tree();
    let total = view.total_size();
    let mut rows = vec![OutlineRow {
        index: view.index(),
        depth: 0,
        size: total,
        percent: percentage(total, total),
    }];

    let mut stack: Vec<(NodeIndex, u16)> = Vec::new();
    if max_depth > 0 {
        push_children(&mut stack, view, view.index(), 1);
    }

    while let Some((index, depth)) = stack.pop() {
        if rows.len() >= MAX_OUTLINE_ROWS {
            break;
        }
        let size = tree.node(index).total_size();
        rows.push(OutlineRow {
            index,
            depth,
            size,
            percent: percentage(size, total),
        });
        if depth < max_depth {
            push_children(&mut stack, view, index, depth + 1);
        }
    }

    rows
}

/// Push children so the largest is popped first.
fn push_children(stack: &mut Vec<(NodeIndex, u16)>, view: UsageView<'_>, parent: NodeIndex, depth: u16) {
    let sorted = view.tree().children_sorted_by_size(parent);
    stack.extend(sorted.into_iter().rev().map(|c| (c, depth)));
}
