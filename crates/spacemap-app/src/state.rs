/// Application state management.
///
/// Centralises all mutable state a frontend reads and writes. The scan
/// thread communicates via a channel; state updates happen in
/// `process_scan_messages()`, which a frontend calls once per frame (or in
/// a polling loop, as the terminal report does).
use anyhow::Context;
use crossbeam_channel::{Receiver, TryRecvError};
use spacemap_core::layout::{hit_test, layout_view, LayoutConfig, PlacedRect, Rect};
use spacemap_core::model::{NodeIndex, UsageTree, UsageView};
use spacemap_core::scanner::{ScanEvent, ScanOptions, ScanSession, ScanStats};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Idle: no scan started yet.
    Idle,
    /// Scanning: progress message and live counters.
    Scanning,
    /// Scan complete: results are available (possibly partial).
    Results,
    /// The scan root could not be read.
    Failed,
}

/// Maximum number of scan events drained from the channel per call.
///
/// Prevents a backlog from blocking the caller for a perceptible duration
/// when it has not polled for a while.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Maximum entries in the treemap back/forward navigation history stacks.
///
/// Prevents unbounded growth under rapid or scripted navigation.
pub const MAX_NAV_HISTORY: usize = 50;

/// All application state.
pub struct AppState {
    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    session: ScanSession,
    events: Option<Receiver<ScanEvent>>,
    pub scan_root: Option<PathBuf>,
    /// Latest human-readable progress line.
    pub scan_message: String,
    pub scan_stats: ScanStats,
    pub scan_duration: Option<Duration>,
    /// True if the most recent scan was cancelled (partial results).
    pub scan_was_cancelled: bool,
    /// Display form of the failure when `phase == Failed`.
    pub scan_error: Option<String>,

    // ── Results ────────────────────────────────────────
    /// The completed scan tree (set once the scan finishes).
    pub tree: Option<UsageTree>,
    pub selected_node: Option<NodeIndex>,

    // ── Treemap navigation ─────────────────────────────
    /// The directory currently shown as root of the treemap.
    /// `None` means the scan root.
    pub treemap_root: Option<NodeIndex>,
    /// Back stack for treemap navigation.
    pub treemap_back: Vec<NodeIndex>,
    /// Forward stack for treemap navigation.
    pub treemap_forward: Vec<NodeIndex>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl AppState {
    /// Create initial application state.
    pub fn new(options: ScanOptions) -> Self {
        Self {
            phase: AppPhase::Idle,
            session: ScanSession::new(options),
            events: None,
            scan_root: None,
            scan_message: String::new(),
            scan_stats: ScanStats::default(),
            scan_duration: None,
            scan_was_cancelled: false,
            scan_error: None,
            tree: None,
            selected_node: None,
            treemap_root: None,
            treemap_back: Vec::new(),
            treemap_forward: Vec::new(),
        }
    }

    /// Start a scan of `path`.
    ///
    /// Any scan already running is cancelled and joined before the new one
    /// starts, so events from the old run can never reach this state.
    pub fn start_scan(&mut self, path: PathBuf) -> anyhow::Result<()> {
        // Drop the old receiver first; anything left on it is stale.
        self.events = None;
        let started = self.session.start(&path);
        self.begin_scan(path, started)
    }

    /// Reset per-scan state and enter `Scanning`, or `Failed` if the scan
    /// thread could not be started.
    fn begin_scan(
        &mut self,
        path: PathBuf,
        started: io::Result<Receiver<ScanEvent>>,
    ) -> anyhow::Result<()> {
        self.scan_stats = ScanStats::default();
        self.scan_duration = None;
        self.scan_was_cancelled = false;
        self.scan_error = None;
        self.tree = None;
        self.selected_node = None;
        self.treemap_root = None;
        self.treemap_back.clear();
        self.treemap_forward.clear();

        let result = match started {
            Ok(events) => {
                self.events = Some(events);
                self.phase = AppPhase::Scanning;
                self.scan_message = format!("Scanning {}...", path.display());
                Ok(())
            }
            Err(err) => {
                warn!("Could not start scan of {}: {err}", path.display());
                self.events = None;
                self.phase = AppPhase::Failed;
                self.scan_message = format!("Error: {err}");
                self.scan_error = Some(err.to_string());
                Err(err).with_context(|| format!("failed to start scan of {}", path.display()))
            }
        };
        self.scan_root = Some(path);
        result
    }

    /// Cancel any running scan. The run still completes with the partial
    /// tree built so far.
    pub fn cancel_scan(&self) {
        self.session.cancel();
    }

    /// `true` until the current scan delivers its result.
    pub fn is_scanning(&self) -> bool {
        self.phase == AppPhase::Scanning
    }

    /// Get a reference to the finished tree, if any.
    pub fn current_tree(&self) -> Option<&UsageTree> {
        self.tree.as_ref()
    }

    /// Process pending scan events. Called once per frame.
    ///
    /// Returns `true` if anything changed and the UI should repaint.
    pub fn process_scan_messages(&mut self) -> bool {
        let Some(events) = self.events.clone() else {
            return false;
        };

        let mut repaint = false;
        let mut messages_this_frame = 0usize;
        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let event = match events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // The thread is gone without a terminal event: it panicked.
                    warn!("Scan ended without a result");
                    self.phase = AppPhase::Failed;
                    self.scan_error = Some("scanner stopped unexpectedly".to_owned());
                    self.events = None;
                    return true;
                }
            };
            messages_this_frame += 1;
            repaint = true;

            match event {
                ScanEvent::Progress { message, stats } => {
                    self.scan_message = message;
                    self.scan_stats = stats;
                }
                ScanEvent::Completed(result) => {
                    info!(
                        "Scan of {} finished: {} nodes, cancelled = {}",
                        self.scan_root.as_deref().unwrap_or(Path::new("?")).display(),
                        result.tree.len(),
                        result.cancelled
                    );
                    self.scan_stats = result.stats;
                    self.scan_duration = Some(result.duration);
                    self.scan_was_cancelled = result.cancelled;
                    self.scan_message = if result.cancelled {
                        "Scan cancelled".to_owned()
                    } else {
                        "Scan complete".to_owned()
                    };
                    self.selected_node = Some(result.tree.root());
                    self.tree = Some(result.tree);
                    self.phase = AppPhase::Results;
                    self.events = None;
                    return true;
                }
                ScanEvent::Failed(failure) => {
                    self.scan_message = format!("Error: {failure}");
                    self.scan_error = Some(failure.to_string());
                    self.phase = AppPhase::Failed;
                    self.events = None;
                    return true;
                }
            }
        }

        repaint
    }

    /// Block (polling) until the current scan reaches a terminal event or
    /// `timeout` elapses. Returns the phase reached.
    pub fn wait_for_scan(&mut self, timeout: Duration) -> AppPhase {
        let deadline = std::time::Instant::now() + timeout;
        while self.phase == AppPhase::Scanning && std::time::Instant::now() < deadline {
            if !self.process_scan_messages() {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        self.phase
    }

    /// The node the treemap is currently drawn for.
    pub fn treemap_view(&self) -> Option<UsageView<'_>> {
        let tree = self.tree.as_ref()?;
        Some(match self.treemap_root {
            Some(index) => tree.virtual_root(index),
            None => tree.view(tree.root()),
        })
    }

    /// Lay out the current treemap root's children inside `bounds`.
    pub fn treemap_layout(&self, bounds: Rect, config: &LayoutConfig) -> Vec<PlacedRect> {
        match self.treemap_view() {
            Some(view) => layout_view(view, bounds, config),
            None => Vec::new(),
        }
    }

    /// Handle a click at `(x, y)` on a treemap laid out in `bounds`.
    ///
    /// Selects the clicked node and zooms into it if it has children.
    /// Returns the clicked node, if any.
    pub fn treemap_click(
        &mut self,
        bounds: Rect,
        config: &LayoutConfig,
        x: f32,
        y: f32,
    ) -> Option<NodeIndex> {
        let rects = self.treemap_layout(bounds, config);
        let node = hit_test(&rects, x, y)?.node;
        self.selected_node = Some(node);

        let has_children = self
            .tree
            .as_ref()
            .is_some_and(|t| t.node(node).has_children());
        if has_children {
            self.treemap_navigate_to(node);
        }
        Some(node)
    }

    fn effective_treemap_root(&self) -> Option<NodeIndex> {
        self.treemap_root
            .or_else(|| self.tree.as_ref().map(|t| t.root()))
    }

    /// Navigate the treemap into a directory, pushing current root onto back stack.
    pub fn treemap_navigate_to(&mut self, node: NodeIndex) {
        if let Some(cur) = self.effective_treemap_root() {
            if cur != node {
                // Evict oldest entry when the history stack is at capacity.
                if self.treemap_back.len() >= MAX_NAV_HISTORY {
                    self.treemap_back.remove(0);
                }
                self.treemap_back.push(cur);
            }
        }
        self.treemap_forward.clear();
        self.treemap_root = Some(node);
    }

    /// Go back in treemap navigation history.
    pub fn treemap_go_back(&mut self) {
        if let Some(prev) = self.treemap_back.pop() {
            if let Some(cur) = self.effective_treemap_root() {
                if self.treemap_forward.len() >= MAX_NAV_HISTORY {
                    self.treemap_forward.remove(0);
                }
                self.treemap_forward.push(cur);
            }
            self.treemap_root = Some(prev);
        }
    }

    /// Go forward in treemap navigation history.
    pub fn treemap_go_forward(&mut self) {
        if let Some(next) = self.treemap_forward.pop() {
            if let Some(cur) = self.effective_treemap_root() {
                if self.treemap_back.len() >= MAX_NAV_HISTORY {
                    self.treemap_back.remove(0);
                }
                self.treemap_back.push(cur);
            }
            self.treemap_root = Some(next);
        }
    }

    /// Navigate treemap up to the parent directory.
    pub fn treemap_go_up(&mut self) {
        let Some(root) = self.treemap_root else {
            return;
        };
        let Some(parent) = self.tree.as_ref().and_then(|t| t.node(root).parent) else {
            return;
        };
        // Cap the back stack consistent with all other nav methods.
        if self.treemap_back.len() >= MAX_NAV_HISTORY {
            self.treemap_back.remove(0);
        }
        self.treemap_back.push(root);
        self.treemap_forward.clear();
        self.treemap_root = Some(parent);
    }
}
