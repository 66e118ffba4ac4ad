/// Scanner module: builds usage trees from the filesystem.
///
/// - [`walker`]: the synchronous, cancellable depth-first walker.
/// - [`start_scan`]: runs the walker on a background thread and streams
///   [`ScanEvent`]s back over a crossbeam channel.
/// - [`session`]: keeps at most one background scan alive at a time.
pub mod error;
pub mod progress;
pub mod session;
pub mod walker;

pub use error::ScanFailure;
pub use progress::{ScanEvent, ScanStats};
pub use session::ScanSession;
pub use walker::{scan_path, FileSystemScanner, ScanResult};

use crossbeam_channel::Receiver;
use progress::EventSender;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Maximum number of events that may queue up in a run's channel.
///
/// Progress updates beyond this are dropped rather than blocking the
/// scanner; one slot is always left for the terminal event.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Tunables for a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Emit a progress event every this many directories.
    pub progress_interval: u64,
    /// Initial arena capacity; the tree grows past it as needed.
    pub estimated_nodes: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            progress_interval: 256,
            estimated_nodes: 4_096,
        }
    }
}

/// Shared cooperative cancellation flag.
///
/// Cloning yields another handle to the same flag. The walker polls it at
/// directory boundaries only.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Handle to a running or completed background scan.
///
/// Dropping the handle cancels the scan and waits for its thread to exit.
pub struct ScanHandle {
    /// Receiver for this run's events.
    pub events: Receiver<ScanEvent>,
    root: PathBuf,
    cancel: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop at the next directory boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// `true` once the scan thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// The path this run was started on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cancel and block until the scan thread has exited.
    ///
    /// Never deadlocks on an undrained channel: the thread only ever
    /// `try_send`s progress and has a reserved slot for its final event.
    pub fn stop(&mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Scanner thread for {} panicked", self.root.display());
            }
        }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a new scan of `root_path` on a background thread.
///
/// The returned handle's `events` receiver yields progress updates followed
/// by exactly one `Completed` or `Failed` event.
pub fn start_scan(root_path: PathBuf, options: ScanOptions) -> io::Result<ScanHandle> {
    let (tx, events) = crossbeam_channel::bounded::<ScanEvent>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let root = root_path.clone();

    let thread = thread::Builder::new()
        .name("spacemap-scanner".into())
        .spawn(move || {
            let sender = EventSender::new(tx);
            info!("Starting scan of {}", root_path.display());
            sender.progress(
                format!("Scanning {}...", root_path.display()),
                ScanStats::default(),
            );

            let scanner = FileSystemScanner::new(options);
            let outcome = scanner.scan(&root_path, &token, |stats, path| {
                sender.progress(format!("Scanning {}", path.display()), *stats);
            });

            match outcome {
                Ok(result) => {
                    info!(
                        files = result.stats.files,
                        directories = result.stats.directories,
                        skipped = result.stats.skipped,
                        cancelled = result.cancelled,
                        "Scan of {} finished in {:?}",
                        root_path.display(),
                        result.duration
                    );
                    sender.finish(ScanEvent::Completed(result));
                }
                Err(failure) => {
                    warn!("Scan failed: {failure}");
                    sender.finish(ScanEvent::Failed(failure));
                }
            }
        })?;

    Ok(ScanHandle {
        events,
        root,
        cancel,
        thread: Some(thread),
    })
}
