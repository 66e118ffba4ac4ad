/// Treemap layout: turns a size-weighted set of siblings into rectangles.
///
/// - [`geometry`]: the `Rect` type.
/// - [`treemap`]: the slice-and-dice engine and hit testing.
/// - [`palette`]: deterministic per-path colours.
pub mod geometry;
pub mod palette;
pub mod treemap;

pub use geometry::Rect;
pub use palette::Rgb;
pub use treemap::{hit_test, layout, layout_view, Label, PlacedRect};

/// Layout tunables. The defaults reproduce the classic look: a 5 px gap
/// between cells, labels on cells larger than 40×30, 15-character names.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Gap subtracted from each cell along the slice axis.
    pub spacing: f32,
    /// A cell must be wider than this to get a label.
    pub min_label_width: f32,
    /// A cell must be taller than this to get a label.
    pub min_label_height: f32,
    /// Maximum characters of the name shown in a label.
    pub label_chars: usize,
    /// Perturbs colour assignment; never affects geometry.
    pub color_seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            min_label_width: 40.0,
            min_label_height: 30.0,
            label_chars: 15,
            color_seed: 0,
        }
    }
}
