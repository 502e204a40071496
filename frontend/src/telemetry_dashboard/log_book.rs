// frontend/src/telemetry_dashboard/log_book.rs

use std::collections::VecDeque;

use super::transport::LogSink;

const MAX_LINES: usize = 500;

/// Bounded operator log, newest line first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBook {
    lines: VecDeque<String>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LogSink for LogBook {
    fn append_log(&mut self, line: String) {
        tracing::info!("{line}");
        self.lines.push_front(line);
        self.lines.truncate(MAX_LINES);
    }
}
