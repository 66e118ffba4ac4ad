/// Scan events: typed messages sent from the scan thread to the caller
/// via a bounded crossbeam channel.
///
/// Every run emits zero or more `Progress` events in pre-order, followed by
/// exactly one terminal event (`Completed` or `Failed`), which is always last.
use super::error::ScanFailure;
use super::walker::ScanResult;
use crossbeam_channel::Sender;

/// Running counters for a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files added to the tree.
    pub files: u64,
    /// Directories added to the tree, including the root.
    pub directories: u64,
    /// Sum of file sizes seen so far.
    pub bytes: u64,
    /// Entries left out: unreadable files, unlistable directories,
    /// symbolic links and special files.
    pub skipped: u64,
}

#[derive(Debug)]
pub enum ScanEvent {
    /// Informational update; safe to drop or ignore.
    Progress { message: String, stats: ScanStats },
    /// The scan produced a tree. `result.cancelled` tells whether it was
    /// truncated by a cancellation request.
    Completed(ScanResult),
    /// The root itself could not be scanned.
    Failed(ScanFailure),
}

impl ScanEvent {
    /// `true` for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Producer side of a run's event channel.
///
/// Holds the only `Sender` for the channel. Progress is sent with
/// `try_send` and only while more than one slot is free, so the single
/// terminal event always has room and `finish` never blocks, even if the
/// caller has stopped draining.
pub(crate) struct EventSender {
    tx: Sender<ScanEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: Sender<ScanEvent>) -> Self {
        Self { tx }
    }

    /// Queue a progress update. Returns `false` if it was dropped.
    pub(crate) fn progress(&self, message: String, stats: ScanStats) -> bool {
        if let Some(capacity) = self.tx.capacity() {
            if self.tx.len() + 1 >= capacity {
                return false;
            }
        }
        self.tx
            .try_send(ScanEvent::Progress { message, stats })
            .is_ok()
    }

    /// Deliver the terminal event and close the channel.
    pub(crate) fn finish(self, event: ScanEvent) {
        debug_assert!(event.is_terminal());
        // A disconnected receiver means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}
