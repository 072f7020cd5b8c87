// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lcm_core::job::{JobId, JobState};
use std::io::Write as _;
use tempfile::tempdir;

fn test_event(n: u64) -> Event {
    Event::JobStateChanged { job: JobId::new(n), state: JobState::Tasked }
}

#[test]
fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    let wal = Wal::open(&path, 0).unwrap();

    assert!(path.exists());
    assert_eq!(wal.write_seq(), 0);
    assert_eq!(wal.processed_seq(), 0);
}

#[test]
fn append_and_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    let seq1 = wal.append(&test_event(1)).unwrap();
    let seq2 = wal.append(&test_event(2)).unwrap();
    assert_eq!(seq1, 1);
    assert_eq!(seq2, 2);

    wal.flush().unwrap();
    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn next_unprocessed_drains_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&test_event(1)).unwrap();
    wal.append(&test_event(2)).unwrap();

    let entry1 = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry1.seq, 1);
    let entry2 = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry2.seq, 2);
    assert!(wal.next_unprocessed().unwrap().is_none());
}

#[test]
fn mark_processed_records_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&test_event(1)).unwrap();
    wal.flush().unwrap();

    let entry = wal.next_unprocessed().unwrap().unwrap();
    wal.mark_processed(entry.seq);

    assert_eq!(wal.processed_seq(), 1);
}

#[test]
fn reopen_with_processed_seq_skips_processed_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_event(1)).unwrap();
        wal.append(&test_event(2)).unwrap();
        wal.append(&test_event(3)).unwrap();
        wal.flush().unwrap();
    }

    let mut wal = Wal::open(&path, 2).unwrap();
    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry.seq, 3);
    assert!(wal.next_unprocessed().unwrap().is_none());
}

#[test]
fn entries_after_returns_strictly_greater() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&test_event(1)).unwrap();
    wal.append(&test_event(2)).unwrap();
    wal.append(&test_event(3)).unwrap();
    wal.flush().unwrap();

    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn truncate_before_drops_earlier_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&test_event(1)).unwrap();
    wal.append(&test_event(2)).unwrap();
    wal.append(&test_event(3)).unwrap();
    wal.flush().unwrap();

    wal.truncate_before(2).unwrap();

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

/// Shutdown must survive a WAL round-trip so a replaying daemon can see and
/// skip it rather than silently losing the marker.
#[test]
fn shutdown_event_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_event(1)).unwrap();
        wal.append(&Event::Shutdown).unwrap();
        wal.flush().unwrap();
    }

    let mut wal = Wal::open(&path, 1).unwrap();
    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(matches!(entries[0].event, Event::Shutdown));

    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert!(matches!(entry.event, Event::Shutdown));
    assert!(wal.next_unprocessed().unwrap().is_none());
}

#[test]
fn needs_flush_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    assert!(!wal.needs_flush());
    for i in 0..101u64 {
        wal.append(&test_event(i)).unwrap();
    }
    assert!(wal.needs_flush());
}

#[test]
fn open_corrupt_wal_creates_bak_and_preserves_valid_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_event(1)).unwrap();
        wal.append(&test_event(2)).unwrap();
        wal.flush().unwrap();
    }
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"not-valid-json\n").unwrap();
    }

    let wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 2);

    let bak = path.with_extension("bak");
    assert!(bak.exists());

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn open_corrupt_wal_rotates_bak_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    for i in 1..=4u8 {
        {
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(&[i; 8]).unwrap();
        }
        let wal = Wal::open(&path, 0).unwrap();
        assert_eq!(wal.write_seq(), 0);
    }

    assert_eq!(std::fs::read(path.with_extension("bak")).unwrap(), vec![4u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.2")).unwrap(), vec![3u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.3")).unwrap(), vec![2u8; 8]);
    assert!(!path.with_extension("bak.4").exists());
}

#[test]
fn next_unprocessed_is_deaf_to_writes_made_outside_this_handle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_event(1)).unwrap();
    wal.flush().unwrap();

    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry.seq, 1);

    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"corrupt-line\n").unwrap();
    }
    assert!(wal.next_unprocessed().unwrap().is_none());

    wal.append(&test_event(2)).unwrap();
    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry.seq, 2);
}

#[test]
fn open_with_binary_wal_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    std::fs::write(&path, b"\x80\x81\x82\xff\xfe\n").unwrap();

    let wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 0);
    assert!(path.with_extension("bak").exists());
}
