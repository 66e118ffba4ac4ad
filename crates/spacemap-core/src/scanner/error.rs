/// Root-level scan failures.
///
/// These are the only errors a scan ever surfaces. Everything that goes
/// wrong below the root (unreadable files, unlistable subdirectories) is
/// absorbed by the walker and shows up as a smaller or tagged tree instead.
/// Cancellation is not a failure either: it produces a truncated tree.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanFailure {
    /// The root path does not exist.
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The root exists but could not be inspected or listed.
    #[error("cannot scan {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanFailure {
    /// Classify an I/O error raised while opening the root.
    pub(crate) fn from_root_error(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// The root path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
