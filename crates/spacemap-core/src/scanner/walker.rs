/// Depth-first filesystem walker that builds a [`UsageTree`].
///
/// Entries are visited in the same pre-order a recursive descent would use:
/// a directory's entries are processed in listing order, and each
/// subdirectory is fully explored before the next sibling entry. The walk
/// keeps one pending listing per level on an explicit stack instead of
/// recursing, so pathological nesting cannot overflow the thread stack.
/// Each listing is read into memory before descending, so only one
/// directory handle is open at a time however deep the tree goes.
///
/// # Fault tolerance
///
/// Only the root can fail the scan. Below it:
/// - files whose metadata cannot be read are skipped;
/// - directories that cannot be listed stay in the tree as childless
///   [`NodeKind::Unreadable`](crate::model::NodeKind::Unreadable) nodes;
/// - symbolic links are never followed and are skipped, which rules out
///   traversal cycles; other special files are skipped too.
///
/// # Cancellation
///
/// The cancel token is checked each time a directory is entered (root
/// included). A directory entered after cancellation stays in the tree with
/// no children, and the finished tree reports [`UsageTree::is_partial`].
use super::error::ScanFailure;
use super::progress::ScanStats;
use super::{CancelToken, ScanOptions};
use crate::model::{root_display_name, NodeIndex, UsageNode, UsageTree};
use compact_str::CompactString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Successful outcome of a scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub tree: UsageTree,
    pub stats: ScanStats,
    pub duration: Duration,
    /// `true` if cancellation truncated the tree.
    pub cancelled: bool,
}

/// A directory whose listing is being processed.
struct Frame {
    dir: NodeIndex,
    entries: std::vec::IntoIter<fs::DirEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct FileSystemScanner {
    options: ScanOptions,
}

impl FileSystemScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `root` into a new tree.
    ///
    /// `progress` is called with the running counters and the directory just
    /// entered, once every `progress_interval` directories, in scan order.
    pub fn scan<F>(
        &self,
        root: &Path,
        cancel: &CancelToken,
        mut progress: F,
    ) -> Result<ScanResult, ScanFailure>
    where
        F: FnMut(&ScanStats, &Path),
    {
        let start = Instant::now();
        let root_path =
            std::path::absolute(root).map_err(|e| ScanFailure::from_root_error(root, e))?;

        // Follows a link if the user pointed the scan at one.
        let meta =
            fs::metadata(&root_path).map_err(|e| ScanFailure::from_root_error(&root_path, e))?;

        let mut stats = ScanStats::default();
        let name = root_display_name(&root_path);

        if meta.is_file() {
            stats.files = 1;
            stats.bytes = meta.len();
            let tree = UsageTree::new(root_path, UsageNode::new_file(name, meta.len()));
            return Ok(finish(tree, stats, start));
        }
        if !meta.is_dir() {
            return Err(ScanFailure::Unreadable {
                path: root_path,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "not a regular file or directory",
                ),
            });
        }

        let mut tree = UsageTree::with_capacity(
            root_path.clone(),
            UsageNode::new_dir(name),
            self.options.estimated_nodes,
        );
        stats.directories = 1;

        if cancel.is_cancelled() {
            tree.mark_partial();
            return Ok(finish(tree, stats, start));
        }

        let entries = list_dir(&root_path, &mut stats)
            .map_err(|e| ScanFailure::from_root_error(&root_path, e))?;
        let mut stack = vec![Frame {
            dir: tree.root(),
            entries: entries.into_iter(),
        }];

        let interval = self.options.progress_interval.max(1);

        while let Some(frame) = stack.last_mut() {
            let parent = frame.dir;
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    stats.skipped += 1;
                    debug!("Skipping {}: {err}", path.display());
                    continue;
                }
            };
            let name = CompactString::new(entry.file_name().to_string_lossy());

            if file_type.is_symlink() {
                stats.skipped += 1;
                debug!("Not following symbolic link {}", path.display());
            } else if file_type.is_file() {
                match entry.metadata() {
                    Ok(meta) => {
                        let size = meta.len();
                        tree.add_child(parent, UsageNode::new_file(name, size));
                        stats.files += 1;
                        stats.bytes += size;
                    }
                    Err(err) => {
                        stats.skipped += 1;
                        debug!("Skipping file {}: {err}", path.display());
                    }
                }
            } else if file_type.is_dir() {
                let dir = tree.add_child(parent, UsageNode::new_dir(name));
                stats.directories += 1;
                if stats.directories % interval == 0 {
                    progress(&stats, &path);
                }

                if cancel.is_cancelled() {
                    tree.mark_partial();
                    continue;
                }

                match list_dir(&path, &mut stats) {
                    Ok(entries) => stack.push(Frame {
                        dir,
                        entries: entries.into_iter(),
                    }),
                    Err(err) => {
                        tree.mark_unreadable(dir);
                        stats.skipped += 1;
                        debug!("Cannot list {}: {err}", path.display());
                    }
                }
            } else {
                stats.skipped += 1;
                debug!("Skipping special file {}", path.display());
            }
        }

        Ok(finish(tree, stats, start))
    }
}

/// Read a whole directory listing and close its handle.
///
/// Entries that fail mid-listing are counted as skipped and left out.
fn list_dir(path: &Path, stats: &mut ScanStats) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        match entry {
            Ok(e) => entries.push(e),
            Err(err) => {
                stats.skipped += 1;
                debug!("Skipping unreadable entry under {}: {err}", path.display());
            }
        }
    }
    Ok(entries)
}

fn finish(tree: UsageTree, stats: ScanStats, start: Instant) -> ScanResult {
    let cancelled = tree.is_partial();
    ScanResult {
        tree,
        stats,
        duration: start.elapsed(),
        cancelled,
    }
}

/// Scan `root` synchronously with default options, no cancellation and no
/// progress reporting.
pub fn scan_path(root: impl Into<PathBuf>) -> Result<UsageTree, ScanFailure> {
    let root = root.into();
    FileSystemScanner::default()
        .scan(&root, &CancelToken::new(), |_, _| {})
        .map(|result| result.tree)
}
