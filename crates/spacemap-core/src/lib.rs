/// SpaceMap Core: scanning, treemap layout, and analysis.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`]: Arena-allocated usage tree, zoom views, size formatting.
/// - [`scanner`]: Cancellable filesystem scanning on a background thread.
/// - [`layout`]: Slice-and-dice treemap geometry.
/// - [`analysis`]: Post-scan summaries (per-folder breakdown, outline).
pub mod analysis;
pub mod layout;
pub mod model;
pub mod scanner;
