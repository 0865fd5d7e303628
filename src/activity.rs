//! Session activity log: a bounded, in-memory record of recent user actions.
//!
//! Owned by the session that records into it; its summary becomes the
//! "recent activity" section of prompts. Nothing is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    FileOpened,
    FileSaved,
    ChatMessage,
    ContentGenerated,
    Command,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::FileOpened => "opened file",
            ActivityKind::FileSaved => "saved file",
            ActivityKind::ChatMessage => "asked",
            ActivityKind::ContentGenerated => "generated",
            ActivityKind::Command => "ran command",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub detail: String,
}

/// Append-only log that keeps the most recent `capacity` entries.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, kind: ActivityKind, detail: impl Into<String>) {
        self.record_at(Utc::now(), kind, detail);
    }

    pub fn record_at(&mut self, timestamp: DateTime<Utc>, kind: ActivityKind, detail: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            timestamp,
            kind,
            detail: detail.into(),
        });
    }

    /// Copy of the current entries, oldest first.
    pub fn snapshot(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Context text for prompts, one line per entry. `None` when empty.
    pub fn summary(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("- [{}] {}: {}", e.timestamp.format("%H:%M:%S"), e.kind, e.detail))
            .collect();
        Some(lines.join("\n"))
    }
}
