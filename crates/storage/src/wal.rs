// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log: every [`Event`] is appended here before it takes effect,
//! so a crash mid-operation replays cleanly from the last snapshot.

use crate::backup::rotate_bak_path;
use crate::error::WalError;
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Flush is forced once this many entries have been appended unflushed.
const FLUSH_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

/// An append-only, newline-delimited JSON log.
///
/// `entries` is the single source of truth for reads once the log is open —
/// `append`, `next_unprocessed`, and `entries_after` all operate on it
/// in-memory. The on-disk file is write-only from that point on; nothing
/// re-parses it until the next `open`. Writes made to the file by another
/// process after `open` are invisible to this handle, by design.
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: Vec<WalEntry>,
    write_seq: u64,
    processed_seq: u64,
    read_cursor: usize,
    unflushed: u32,
}

impl Wal {
    /// Open (creating if absent) the log at `path`, recovering from any
    /// trailing corruption, and position the unprocessed-read cursor just
    /// past `processed_seq`.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let raw = if path.exists() { fs::read(&path)? } else { Vec::new() };

        let (entries, valid_len) = parse_entries(&raw);
        if valid_len < raw.len() {
            let bak = rotate_bak_path(&path);
            fs::write(&bak, &raw)?;
            fs::write(&path, &raw[..valid_len])?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        let read_cursor = entries.iter().position(|e| e.seq > processed_seq).unwrap_or(entries.len());

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries,
            write_seq,
            processed_seq,
            read_cursor,
            unflushed: 0,
        })
    }

    /// Append `event`, returning its assigned sequence number.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let entry = WalEntry { seq, event: event.clone() };
        let line = serde_json::to_string(&entry)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.entries.push(entry);
        self.write_seq = seq;
        self.unflushed += 1;
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.unflushed = 0;
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Pop the next entry past the processed cursor, advancing it.
    ///
    /// Returns `None`, never an error, once the in-memory log is exhausted —
    /// callers replaying the WAL treat exhaustion as "caught up", not as a
    /// fault.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, WalError> {
        if self.read_cursor < self.entries.len() {
            let entry = self.entries[self.read_cursor].clone();
            self.read_cursor += 1;
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = seq;
    }

    /// All entries with `seq` strictly greater than `seq`.
    pub fn entries_after(&self, seq: u64) -> Result<Vec<WalEntry>, WalError> {
        Ok(self.entries.iter().filter(|e| e.seq > seq).cloned().collect())
    }

    /// Drop entries with `seq < seq` from memory and rewrite the file to
    /// match, once their content is durably captured in a snapshot.
    pub fn truncate_before(&mut self, seq: u64) -> Result<(), WalError> {
        let keep_from = self.entries.iter().position(|e| e.seq >= seq).unwrap_or(self.entries.len());
        self.entries.drain(0..keep_from);
        self.read_cursor = self.read_cursor.saturating_sub(keep_from);

        let mut rewritten = Vec::new();
        for entry in &self.entries {
            serde_json::to_writer(&mut rewritten, entry)?;
            rewritten.push(b'\n');
        }
        fs::write(&self.path, &rewritten)?;

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        self.unflushed = 0;
        Ok(())
    }
}

/// Parse as many whole, valid JSON lines as possible from `raw`.
///
/// Returns the parsed entries and the byte length of the valid prefix. The
/// first line that isn't valid UTF-8 or valid JSON ends the valid prefix;
/// everything from there on is treated as corruption.
fn parse_entries(raw: &[u8]) -> (Vec<WalEntry>, usize) {
    let mut entries = Vec::new();
    let mut valid_len = 0usize;

    for line in raw.split_inclusive(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let text = match std::str::from_utf8(line) {
            Ok(t) => t,
            Err(_) => break,
        };
        let trimmed = text.trim_end_matches('\n').trim_end_matches('\r');
        if trimmed.is_empty() {
            valid_len += line.len();
            continue;
        }
        match serde_json::from_str::<WalEntry>(trimmed) {
            Ok(entry) => {
                entries.push(entry);
                valid_len += line.len();
            }
            Err(_) => break,
        }
    }

    (entries, valid_len)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
