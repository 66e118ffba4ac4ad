/// SpaceMap frontend: scan state machine and terminal report.
///
/// This crate contains all presentation code. Business logic lives in
/// `spacemap-core`.
pub mod cli;
pub mod report;
pub mod state;

pub use cli::Cli;
pub use state::{AppPhase, AppState};

use anyhow::{bail, Context};
use report::{Report, ReportOptions};
use spacemap_core::scanner::ScanOptions;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// How often the progress line is refreshed while scanning.
const PROGRESS_POLL: Duration = Duration::from_millis(250);

/// Scan `cli.path`, then print the report to stdout.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut state = AppState::new(ScanOptions::default());
    state.start_scan(cli.path.clone())?;

    let mut last_message = String::new();
    while state.phase == AppPhase::Scanning {
        state.wait_for_scan(PROGRESS_POLL);
        if state.scan_message != last_message {
            info!("{}", state.scan_message);
            last_message.clone_from(&state.scan_message);
        }
        debug!(
            "{} files, {} folders so far",
            state.scan_stats.files, state.scan_stats.directories
        );
    }

    if state.phase == AppPhase::Failed {
        bail!("{}", state.scan_error.as_deref().unwrap_or("scan failed"));
    }

    let Some(tree) = state.current_tree() else {
        bail!("scan finished without a tree");
    };

    if let Some(zoom) = &cli.zoom {
        let node = tree
            .find(zoom)
            .with_context(|| format!("{} is not part of the scanned tree", zoom.display()))?;
        state.treemap_navigate_to(node);
    }

    let view = state
        .treemap_view()
        .context("scan finished without a tree")?;
    let options = ReportOptions {
        top: cli.top,
        depth: cli.depth,
        bounds: cli.bounds(),
        layout: cli.layout_config(),
    };
    let report = Report::build(
        view,
        &state.scan_stats,
        state.scan_duration.unwrap_or_default(),
        &options,
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report.write_json(&mut out).context("failed to write JSON report")?;
    } else {
        report.write_text(&mut out).context("failed to write report")?;
    }
    out.flush()?;
    Ok(())
}
