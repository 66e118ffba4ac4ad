/// End-to-end tests for `ScanSession`: one scan at a time, restarts wait for
/// the previous run, and each run delivers exactly one terminal event.
use spacemap_core::scanner::{ScanEvent, ScanOptions, ScanSession};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

fn make_temp_tree(dirs: usize) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for i in 0..dirs {
        let dir = tmp.path().join(format!("d{i:03}"));
        fs::create_dir(&dir).unwrap();
        write_bytes(&dir.join("payload"), 64);
    }
    tmp
}

fn terminal_count(events: &[ScanEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}

#[test]
fn session_completes_a_scan() {
    let tmp = make_temp_tree(3);
    let session = ScanSession::new(ScanOptions::default());
    session.start(tmp.path()).unwrap();

    match session.wait() {
        Some(ScanEvent::Completed(result)) => {
            assert_eq!(result.tree.total_size(), 192);
            assert!(!result.cancelled);
        }
        other => panic!("expected Completed, got {other:?}"),
    }
    // Terminal event already consumed.
    assert!(session.wait().is_none());
}

#[test]
fn recv_timeout_polls_the_current_run() {
    let tmp = make_temp_tree(2);
    let session = ScanSession::default();
    assert!(session.recv_timeout(Duration::from_millis(10)).is_none());

    session.start(tmp.path()).unwrap();
    match session.recv_timeout(Duration::from_secs(30)) {
        Some(ScanEvent::Progress { message, .. }) => assert!(message.starts_with("Scanning ")),
        other => panic!("expected the start message, got {other:?}"),
    }
    assert!(matches!(session.wait(), Some(ScanEvent::Completed(_))));
    // Nothing follows the terminal event.
    assert!(session.recv_timeout(Duration::from_millis(50)).is_none());
}

#[test]
fn restart_stops_previous_run_first() {
    let first = make_temp_tree(300);
    let second = make_temp_tree(2);
    let session = ScanSession::default();

    let first_events = session.start(first.path()).unwrap();
    let second_events = session.start(second.path()).unwrap();

    // `start` joined the first run, so its channel is already closed.
    let first_all: Vec<ScanEvent> = first_events.try_iter().collect();
    assert_eq!(terminal_count(&first_all), 1);
    assert!(matches!(first_all.last(), Some(ScanEvent::Completed(_))));

    let second_all: Vec<ScanEvent> = second_events.iter().collect();
    assert_eq!(terminal_count(&second_all), 1);
    match second_all.last() {
        Some(ScanEvent::Completed(result)) => assert_eq!(result.tree.total_size(), 128),
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[test]
fn cancel_then_restart_is_serialised() {
    let tmp = make_temp_tree(50);
    let session = ScanSession::default();

    let old = session.start(tmp.path()).unwrap();
    session.cancel();
    let new = session.start(tmp.path()).unwrap();

    assert!(old.try_iter().any(|e| matches!(e, ScanEvent::Completed(_))));
    match new.recv_timeout(Duration::from_secs(30)) {
        Ok(_) => {}
        Err(e) => panic!("new run produced no events: {e}"),
    }
    assert!(matches!(session.wait(), Some(ScanEvent::Completed(_))));
}

#[test]
fn failed_root_reports_failure() {
    let tmp = TempDir::new().unwrap();
    let session = ScanSession::default();
    session.start(tmp.path().join("missing")).unwrap();

    match session.wait() {
        Some(ScanEvent::Failed(failure)) => assert!(failure.is_not_found()),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn stop_without_run_is_a_no_op() {
    let session = ScanSession::default();
    session.cancel();
    session.stop();
    assert!(!session.is_running());
    assert!(session.try_recv().is_none());
}
