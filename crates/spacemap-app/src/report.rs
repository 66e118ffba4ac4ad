/// Terminal report for a finished scan.
///
/// A [`Report`] gathers what a frontend would show for one folder as plain
/// data, so it can be rendered as text or serialised as JSON from the same
/// source.
use serde::Serialize;
use spacemap_core::analysis::{breakdown, outline};
use spacemap_core::layout::{layout_view, LayoutConfig, Rect};
use spacemap_core::model::size::{format_count, format_size};
use spacemap_core::model::{NodeKind, UsageView};
use spacemap_core::scanner::ScanStats;
use std::io::{self, Write};
use std::time::Duration;

/// How much of the tree to put in a report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Breakdown rows to keep; 0 keeps all.
    pub top: usize,
    /// Outline depth below the reported folder.
    pub depth: u16,
    pub bounds: Rect,
    pub layout: LayoutConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top: 20,
            depth: 2,
            bounds: Rect::from_size(800.0, 600.0),
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub path: String,
    pub total_size: u64,
    pub total_size_display: String,
    /// Files at or below the reported folder.
    pub files: u64,
    /// Folders at or below the reported folder, itself included.
    pub directories: u64,
    /// Entries the whole scan left out; not limited to the reported folder.
    pub skipped: u64,
    pub partial: bool,
    pub duration_ms: u128,
    pub breakdown: Vec<ShareEntry>,
    pub outline: Vec<OutlineEntry>,
    pub treemap: TreemapReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineEntry {
    pub depth: u16,
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreemapReport {
    pub bounds: Rect,
    pub cells: Vec<TreemapCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreemapCell {
    pub path: String,
    pub size: u64,
    pub rect: Rect,
    pub color: String,
    /// `"name\nsize"` when the cell is large enough to carry a label.
    pub label: Option<String>,
}

impl Report {
    /// Build the report for `view` (the scan root or a zoomed folder).
    pub fn build(
        view: UsageView<'_>,
        stats: &ScanStats,
        duration: Duration,
        options: &ReportOptions,
    ) -> Self {
        let tree = view.tree();
        let total = view.total_size();

        let mut shares = breakdown(view);
        if options.top > 0 {
            shares.truncate(options.top);
        }
        let breakdown = shares
            .into_iter()
            .map(|row| ShareEntry {
                kind: tree.node(row.index).kind,
                name: row.name,
                size: row.size,
                percent: row.percent,
            })
            .collect();

        let outline = outline(view, options.depth)
            .into_iter()
            .map(|row| OutlineEntry {
                depth: row.depth,
                name: tree.node(row.index).name.to_string(),
                kind: tree.node(row.index).kind,
                size: row.size,
                percent: row.percent,
            })
            .collect();

        let cells = layout_view(view, options.bounds, &options.layout)
            .into_iter()
            .map(|placed| TreemapCell {
                path: tree.full_path(placed.node).to_string_lossy().into_owned(),
                size: tree.node(placed.node).total_size(),
                rect: placed.rect,
                color: placed.color.to_hex(),
                label: placed.label.map(|l| format!("{}\n{}", l.name, l.size)),
            })
            .collect();

        Self {
            path: view.path().to_string_lossy().into_owned(),
            total_size: total,
            total_size_display: format_size(total),
            files: view.node().file_count(),
            directories: count_directories(view),
            skipped: stats.skipped,
            partial: tree.is_partial(),
            duration_ms: duration.as_millis(),
            breakdown,
            outline,
            treemap: TreemapReport {
                bounds: options.bounds,
                cells,
            },
        }
    }

    /// Human-readable rendering.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.path)?;
        writeln!(
            out,
            "  {} in {} files, {} folders ({} ms)",
            self.total_size_display,
            format_count(self.files),
            format_count(self.directories),
            self.duration_ms
        )?;
        if self.skipped > 0 {
            writeln!(
                out,
                "  {} entries skipped during the scan",
                format_count(self.skipped)
            )?;
        }
        if self.partial {
            writeln!(out, "  (partial: scan was cancelled)")?;
        }

        writeln!(out)?;
        writeln!(out, "Largest entries")?;
        for row in &self.breakdown {
            writeln!(
                out,
                "  {:>10}  {:>5.1}%  {}{}",
                format_size(row.size),
                row.percent,
                row.name,
                kind_suffix(row.kind)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Outline")?;
        for row in &self.outline {
            writeln!(
                out,
                "  {:>10}  {:>5.1}%  {}{}{}",
                format_size(row.size),
                row.percent,
                "  ".repeat(usize::from(row.depth)),
                row.name,
                kind_suffix(row.kind)
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Treemap {}x{}",
            self.treemap.bounds.width, self.treemap.bounds.height
        )?;
        for cell in &self.treemap.cells {
            let label = cell
                .label
                .as_deref()
                .map(|l| l.replace('\n', " "))
                .unwrap_or_default();
            writeln!(
                out,
                "  [{:>7.1} {:>7.1} {:>7.1} {:>7.1}] {}  {}",
                cell.rect.x, cell.rect.y, cell.rect.width, cell.rect.height, cell.color, label
            )?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out).map_err(serde_json::Error::io)
    }
}

fn count_directories(view: UsageView<'_>) -> u64 {
    let tree = view.tree();
    let mut stack = vec![view.index()];
    let mut dirs = 0;
    while let Some(index) = stack.pop() {
        if tree.node(index).is_dir() {
            dirs += 1;
        }
        stack.extend(tree.children(index));
    }
    dirs
}

fn kind_suffix(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::File => "",
        NodeKind::Directory => "/",
        NodeKind::Unreadable => "/ (unreadable)",
    }
}
