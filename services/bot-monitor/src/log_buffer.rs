//! Bounded newest-first console log

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of retained lines
pub const LOG_CAPACITY: usize = 50;

/// Lines present before the monitor first runs, in display order
pub const SEED_MESSAGES: [&str; 2] = ["System kernel initialized.", "Secure API tunnel established."];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Newest-first ring of log lines, capped at [`LOG_CAPACITY`]
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    /// Buffer holding the two seed lines, stamped `at`
    pub fn seeded(at: DateTime<Utc>) -> Self {
        let mut buffer = Self::new();
        for message in SEED_MESSAGES.iter().rev() {
            buffer.push(at, *message);
        }
        buffer
    }

    /// Prepend a line, dropping the oldest beyond capacity
    pub fn push(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        self.lines.push_front(LogLine {
            at,
            message: message.into(),
        });
        self.lines.truncate(LOG_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn newest(&self) -> Option<&LogLine> {
        self.lines.front()
    }

    /// Lines newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Rendered lines newest first
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}
