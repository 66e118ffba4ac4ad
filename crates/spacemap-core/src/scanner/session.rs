/// A scan session: at most one background scan at a time.
///
/// Starting a new run first cancels the current one and waits for its
/// thread to exit, so two scanners never run or emit concurrently. Each run
/// gets its own event channel; a receiver handed out for an earlier run
/// still yields that run's remaining events, terminal event included.
use super::progress::ScanEvent;
use super::{start_scan, ScanHandle, ScanOptions};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
pub struct ScanSession {
    options: ScanOptions,
    active: Mutex<Option<ScanHandle>>,
}

impl ScanSession {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            active: Mutex::new(None),
        }
    }

    /// Start scanning `root`, stopping any previous run first.
    ///
    /// Blocks until the previous run's thread has exited. Returns the
    /// receiver for the new run's events.
    pub fn start(&self, root: impl Into<PathBuf>) -> io::Result<Receiver<ScanEvent>> {
        let mut active = self.active.lock();
        if let Some(mut previous) = active.take() {
            debug!("Stopping previous scan of {}", previous.root().display());
            previous.stop();
        }

        let handle = start_scan(root.into(), self.options.clone())?;
        let events = handle.events.clone();
        *active = Some(handle);
        Ok(events)
    }

    /// Request cooperative cancellation of the current run, if any.
    ///
    /// The run still finishes with a `Completed` event carrying a
    /// truncated tree.
    pub fn cancel(&self) {
        if let Some(handle) = self.active.lock().as_ref() {
            handle.cancel();
        }
    }

    /// Cancel the current run and wait for its thread to exit.
    pub fn stop(&self) {
        if let Some(mut handle) = self.active.lock().take() {
            handle.stop();
        }
    }

    /// `true` while a scan thread is alive.
    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Receiver for the current run's events.
    pub fn events(&self) -> Option<Receiver<ScanEvent>> {
        self.active.lock().as_ref().map(|h| h.events.clone())
    }

    /// Non-blocking poll of the current run's next event.
    pub fn try_recv(&self) -> Option<ScanEvent> {
        self.events()?.try_recv().ok()
    }

    /// Wait up to `timeout` for the current run's next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScanEvent> {
        match self.events()?.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Block until the current run's terminal event, discarding progress.
    ///
    /// Returns `None` if there is no run or its terminal event was already
    /// consumed.
    pub fn wait(&self) -> Option<ScanEvent> {
        let events = self.events()?;
        events.iter().find(ScanEvent::is_terminal)
    }
}
