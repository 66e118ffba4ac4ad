/// End-to-end scanner integration tests.
///
/// These tests exercise the real walker and the background `start_scan`
/// thread against a real temporary filesystem, verifying tree shape, sizes,
/// fault tolerance, cancellation, and the event contract (progress first,
/// exactly one terminal event, always last).
use spacemap_core::model::{NodeKind, UsageTree};
use spacemap_core::scanner::{
    scan_path, start_scan, CancelToken, FileSystemScanner, ScanEvent, ScanFailure, ScanOptions,
    PROGRESS_CHANNEL_CAPACITY,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for scanner tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt   (100 bytes)
///     b.rs    (200 bytes)
///   beta/
///     c.png   (300 bytes)
///   d.zip     (400 bytes)
/// ```
///
/// Total file bytes: 1 000.
fn build_test_tree(root: &Path) {
    let alpha = root.join("alpha");
    let beta = root.join("beta");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("d.zip"), 400);
}

/// `width` sibling directories, each holding one 10-byte file.
fn build_wide_tree(root: &Path, width: usize) {
    for i in 0..width {
        let dir = root.join(format!("dir{i:04}"));
        fs::create_dir(&dir).unwrap();
        write_bytes(&dir.join("f.bin"), 10);
    }
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Collect every event of a run until the channel disconnects.
///
/// Waits up to 30 seconds: far more than any tmpdir scan needs on CI, but
/// short enough that a genuinely stuck test does not block the suite.
fn collect_events(handle: &spacemap_core::scanner::ScanHandle) -> Vec<ScanEvent> {
    let deadline = Instant::now() + Duration::from_secs(30);
    let mut events = Vec::new();
    loop {
        assert!(Instant::now() < deadline, "scanner did not finish within 30 seconds");
        match handle.events.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => events.push(event),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => return events,
        }
    }
}

fn completed_tree(events: Vec<ScanEvent>) -> UsageTree {
    match events.into_iter().last() {
        Some(ScanEvent::Completed(result)) => result.tree,
        other => panic!("expected Completed as the last event, got {other:?}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The scanner must visit all files and directories and sum their sizes.
#[test]
fn scan_discovers_all_files() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let tree = scan_path(tmp.path()).expect("scan must succeed");
    // 1 root + 2 dirs + 4 files.
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.total_size(), 1_000);

    let alpha = tree.find(Path::new("alpha")).unwrap();
    assert_eq!(tree.node(alpha).total_size(), 300);
    assert_eq!(tree.node(alpha).own_size, 0);
    assert_eq!(tree.node(alpha).file_count(), 2);
    assert!(tree.full_path(alpha).is_absolute());
}

/// Every node's total must equal its own size plus its children's totals.
#[test]
fn scan_totals_are_consistent() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    fs::create_dir_all(tmp.path().join("deep/er/still")).unwrap();
    write_bytes(&tmp.path().join("deep/er/still/x"), 5);

    let tree = scan_path(tmp.path()).unwrap();
    for (idx, node) in tree.iter() {
        let children: u64 = tree
            .children(idx)
            .map(|c| tree.node(c).total_size())
            .sum();
        assert_eq!(node.total_size(), node.own_size + children);
        if node.has_children() {
            assert_eq!(node.own_size, 0, "directories carry no own size");
        }
    }
    assert_eq!(tree.total_size(), 1_005);
}

/// One 100-byte file plus one empty subdirectory.
#[test]
fn scan_file_and_empty_subdirectory() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("hundred"), 100);
    fs::create_dir(tmp.path().join("void")).unwrap();

    let tree = scan_path(tmp.path()).unwrap();
    assert_eq!(tree.total_size(), 100);
    assert_eq!(tree.children(tree.root()).count(), 2);

    let void = tree.find(Path::new("void")).unwrap();
    assert_eq!(tree.node(void).kind, NodeKind::Directory);
    assert_eq!(tree.node(void).total_size(), 0);
    assert!(!tree.node(void).has_children());
}

/// Scans of an empty directory must succeed with exactly 1 node (the root).
#[test]
fn scan_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");

    let tree = scan_path(tmp.path()).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.total_size(), 0, "empty directory should have 0 total size");
}

/// A missing root fails with NotFound and never yields a tree.
#[test]
fn scan_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");

    assert!(scan_path(&missing).unwrap_err().is_not_found());

    let handle = start_scan(missing, ScanOptions::default()).unwrap();
    let events = collect_events(&handle);
    match events.last() {
        Some(ScanEvent::Failed(failure)) => assert!(failure.is_not_found()),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

/// The background run starts with a progress message and ends with exactly
/// one terminal event.
#[test]
fn background_scan_event_contract() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf(), ScanOptions::default()).unwrap();
    let events = collect_events(&handle);

    match events.first() {
        Some(ScanEvent::Progress { message, .. }) => {
            assert!(message.starts_with("Scanning "), "unexpected message {message:?}")
        }
        other => panic!("expected an initial Progress event, got {other:?}"),
    }
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(events.last().unwrap().is_terminal());

    let tree = completed_tree(events);
    assert_eq!(tree.total_size(), 1_000);
}

/// Progress updates arrive in pre-order with non-decreasing counters.
#[test]
fn progress_counters_grow_monotonically() {
    let tmp = TempDir::new().unwrap();
    build_wide_tree(tmp.path(), 40);

    let options = ScanOptions {
        progress_interval: 4,
        ..ScanOptions::default()
    };
    let handle = start_scan(tmp.path().to_path_buf(), options).unwrap();
    let events = collect_events(&handle);

    let dirs: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Progress { stats, .. } => Some(stats.directories),
            _ => None,
        })
        .collect();
    assert!(dirs.len() > 1, "expected periodic progress, got {dirs:?}");
    assert!(dirs.windows(2).all(|w| w[0] <= w[1]));
}

/// Cancelling through the walker's own progress callback truncates the tree
/// deterministically but still yields a valid tree.
#[test]
fn cancellation_truncates_but_succeeds() {
    let tmp = TempDir::new().unwrap();
    build_wide_tree(tmp.path(), 20);
    let full = scan_path(tmp.path()).unwrap().total_size();

    let cancel = CancelToken::new();
    let scanner = FileSystemScanner::new(ScanOptions {
        progress_interval: 1,
        ..ScanOptions::default()
    });
    let result = scanner
        .scan(tmp.path(), &cancel, |_, _| cancel.cancel())
        .expect("cancellation is not an error");

    assert!(result.cancelled);
    assert!(result.tree.is_partial());
    assert!(result.tree.total_size() < full);
    // Every directory is still present, just emptied.
    assert_eq!(result.tree.children(result.tree.root()).count(), 20);
}

/// Cancelling a background scan still ends in `Completed`, never `Failed`.
#[test]
fn background_cancellation_completes() {
    let tmp = TempDir::new().unwrap();
    build_wide_tree(tmp.path(), 200);
    let full = scan_path(tmp.path()).unwrap().total_size();

    let handle = start_scan(tmp.path().to_path_buf(), ScanOptions::default()).unwrap();
    // The scanner may already be done by the time the flag is read.
    handle.cancel();
    assert!(handle.is_cancelled());

    let events = collect_events(&handle);
    let tree = completed_tree(events);
    assert!(tree.total_size() <= full);
}

/// Directories that cannot be listed stay in the tree as unreadable leaves.
#[cfg(unix)]
#[test]
fn unreadable_subdirectory_is_kept_with_zero_size() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("ok.bin"), 50);
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_bytes(&locked.join("hidden.bin"), 500);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list the directory anyway; nothing to test then.
    let effective = fs::read_dir(&locked).is_err();
    let tree = scan_path(tmp.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if !effective {
        return;
    }

    let tree = tree.expect("a locked subdirectory must not fail the scan");
    let node = tree.find(Path::new("locked")).expect("locked dir stays visible");
    assert_eq!(tree.node(node).kind, NodeKind::Unreadable);
    assert_eq!(tree.node(node).total_size(), 0);
    assert_eq!(tree.total_size(), 50);
}

/// Nesting deeper than the default open-file limit (1024) must still be
/// scanned completely: no level may be tagged unreadable for lack of
/// file descriptors.
#[cfg(unix)]
#[test]
fn deep_nesting_is_scanned_completely() {
    const LEVELS: usize = 1_100;

    let tmp = TempDir::new().unwrap();
    let mut deepest = tmp.path().to_path_buf();
    for _ in 0..LEVELS {
        deepest.push("d");
    }
    fs::create_dir_all(&deepest).unwrap();
    write_bytes(&deepest.join("leaf.bin"), 100);

    let tree = scan_path(tmp.path()).expect("deep trees must scan");
    // Root + every level + the file.
    assert_eq!(tree.len(), LEVELS + 2);
    assert_eq!(tree.total_size(), 100);
    assert!(tree
        .iter()
        .all(|(_, node)| node.kind != NodeKind::Unreadable));
    let dirs = tree
        .iter()
        .filter(|(_, node)| node.kind == NodeKind::Directory)
        .count();
    assert_eq!(dirs, LEVELS + 1);
}

/// A root that exists but cannot be listed fails the whole scan.
#[cfg(unix)]
#[test]
fn unlistable_root_fails_as_unreadable() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_bytes(&locked.join("hidden.bin"), 10);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list the directory anyway; nothing to test then.
    let effective = fs::read_dir(&locked).is_err();
    let events = if effective {
        let handle = start_scan(locked.clone(), ScanOptions::default()).unwrap();
        collect_events(&handle)
    } else {
        Vec::new()
    };
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if !effective {
        return;
    }

    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    match events.last() {
        Some(ScanEvent::Failed(ScanFailure::Unreadable { path, .. })) => {
            assert!(path.ends_with("locked"))
        }
        other => panic!("expected Failed(Unreadable), got {other:?}"),
    }
}

/// A root that is neither a regular file nor a directory yields no tree.
#[cfg(unix)]
#[test]
fn special_file_root_fails() {
    let dev_null = Path::new("/dev/null");
    if !dev_null.exists() {
        return;
    }

    let failure = scan_path(dev_null).expect_err("a device is not scannable");
    assert!(matches!(failure, ScanFailure::Unreadable { .. }));
    assert!(!failure.is_not_found());

    let handle = start_scan(dev_null.to_path_buf(), ScanOptions::default()).unwrap();
    let events = collect_events(&handle);
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, ScanEvent::Completed(_))));
    assert!(matches!(
        events.last(),
        Some(ScanEvent::Failed(ScanFailure::Unreadable { .. }))
    ));
}

/// `PROGRESS_CHANNEL_CAPACITY` must leave room for at least one progress
/// message next to the reserved terminal slot.
const _: () = assert!(
    PROGRESS_CHANNEL_CAPACITY > 1,
    "PROGRESS_CHANNEL_CAPACITY must be > 1"
);
