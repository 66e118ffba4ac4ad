/// Slice-and-dice treemap layout.
///
/// One call lays out one level: the given siblings are sorted by size
/// (largest first, stable) and sliced along a single axis: along x when the
/// bounds are at least as wide as they are tall, along y otherwise. Each
/// cell spans the full cross-axis and a share of the slice axis proportional
/// to its size, minus a fixed spacing gap. Drilling into a cell is done by
/// the caller: lay out that node's children again in the same bounds.
///
/// The engine is pure: identical inputs give bit-identical output.
use super::geometry::Rect;
use super::palette::{color_for, Rgb};
use super::LayoutConfig;
use crate::model::size::format_size;
use crate::model::{NodeIndex, UsageTree, UsageView};
use serde::Serialize;
use std::cmp::Reverse;

/// Text to show inside a cell that is large enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Leading characters of the node's name.
    pub name: String,
    /// Formatted total size, e.g. `"1.5 MB"`.
    pub size: String,
}

/// A cell placed by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRect {
    pub node: NodeIndex,
    pub rect: Rect,
    pub label: Option<Label>,
    pub color: Rgb,
}

/// Lay out `children` inside `bounds`, sized relative to `total_size`.
///
/// Children whose share is zero (empty nodes, or `total_size == 0`) get no
/// cell and do not advance the cursor. Cells may come out with a
/// non-positive extent when the spacing exceeds a thin slice.
pub fn layout(
    tree: &UsageTree,
    children: &[NodeIndex],
    bounds: Rect,
    total_size: u64,
    config: &LayoutConfig,
) -> Vec<PlacedRect> {
    if children.is_empty() || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Vec::new();
    }

    let mut items = children.to_vec();
    items.sort_by_key(|c| Reverse(tree.node(*c).total_size()));

    let horizontal = bounds.width >= bounds.height;
    let mut cursor = if horizontal { bounds.x } else { bounds.y };
    let mut placed = Vec::with_capacity(items.len());

    for node in items {
        let size = tree.node(node).total_size();
        if size == 0 || total_size == 0 {
            continue;
        }
        let ratio = (size as f64 / total_size as f64) as f32;

        let (rect, extent) = if horizontal {
            let w = bounds.width * ratio;
            (
                Rect::new(cursor, bounds.y, w - config.spacing, bounds.height),
                w,
            )
        } else {
            let h = bounds.height * ratio;
            (
                Rect::new(bounds.x, cursor, bounds.width, h - config.spacing),
                h,
            )
        };
        cursor += extent;

        let path = tree.full_path(node);
        placed.push(PlacedRect {
            node,
            rect,
            label: label_for(tree, node, &rect, config),
            color: color_for(path.as_os_str().as_encoded_bytes(), config.color_seed),
        });
    }

    placed
}

/// Lay out the children of a (possibly zoomed) view against its own total.
pub fn layout_view(view: UsageView<'_>, bounds: Rect, config: &LayoutConfig) -> Vec<PlacedRect> {
    let children: Vec<NodeIndex> = view.children().collect();
    layout(view.tree(), &children, bounds, view.total_size(), config)
}

/// The cell under a point, ignoring degenerate cells.
pub fn hit_test(rects: &[PlacedRect], x: f32, y: f32) -> Option<&PlacedRect> {
    rects.iter().find(|p| p.rect.contains(x, y))
}

/// Thresholds apply to the cell as drawn, after spacing is taken off.
fn label_for(tree: &UsageTree, node: NodeIndex, rect: &Rect, config: &LayoutConfig) -> Option<Label> {
    if rect.width <= config.min_label_width || rect.height <= config.min_label_height {
        return None;
    }
    let n = tree.node(node);
    Some(Label {
        name: n.name.chars().take(config.label_chars).collect(),
        size: format_size(n.total_size()),
    })
}
