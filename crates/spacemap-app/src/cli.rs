//! Command-line interface definition.

use clap::Parser;
use spacemap_core::layout::{LayoutConfig, Rect};
use std::path::PathBuf;

/// Scan a folder and report where its space goes.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spacemap",
    version,
    about = "Disk space usage analyser with a slice-and-dice treemap",
    long_about = None
)]
pub struct Cli {
    /// Folder (or file) to scan.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Treemap canvas width in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Treemap canvas height in pixels.
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Gap between treemap cells in pixels.
    #[arg(long, default_value_t = 5.0)]
    pub spacing: f32,

    /// Zoom the report into a subfolder (relative to PATH, or absolute).
    #[arg(long, value_name = "SUBPATH")]
    pub zoom: Option<PathBuf>,

    /// Outline depth below the reported folder.
    #[arg(long, default_value_t = 2)]
    pub depth: u16,

    /// Number of rows in the breakdown table (0 = all).
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Emit the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Seed for treemap cell colours.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            spacing: self.spacing,
            color_seed: self.seed,
            ..LayoutConfig::default()
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}
