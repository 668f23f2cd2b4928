//! User-facing log panel
//!
//! The pipeline reports everything the user should see (transport failures,
//! backend errors, where they are) through a [`LogSink`]. [`LogPanel`] is the
//! default sink: it timestamps each line, keeps the newest first and mirrors
//! every line to the `log` facade.

use chrono::{Local, NaiveDateTime};
use std::collections::VecDeque;
use std::fmt;

/// Receives user-visible status lines
pub trait LogSink {
    fn log(&mut self, message: &str);
}

/// A timestamped panel line
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: NaiveDateTime,
    pub text: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.at.format("%Y-%m-%d %H:%M:%S"), self.text)
    }
}

/// Bounded, newest-first list of log lines
#[derive(Debug, Clone)]
pub struct LogPanel {
    lines: VecDeque<LogLine>,
    max_lines: usize,
}

impl LogPanel {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(64)),
            max_lines: max_lines.max(1),
        }
    }

    pub fn push_at(&mut self, at: NaiveDateTime, text: impl Into<String>) {
        self.lines.push_front(LogLine {
            at,
            text: text.into(),
        });
        self.lines.truncate(self.max_lines);
    }

    /// Lines, newest first
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn latest(&self) -> Option<&LogLine> {
        self.lines.front()
    }

    /// True when any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new(crate::core::constants::DEFAULT_LOG_LINES)
    }
}

impl LogSink for LogPanel {
    fn log(&mut self, message: &str) {
        log::info!("{}", message);
        self.push_at(Local::now().naive_local(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .unwrap()
    }

    #[test]
    fn test_line_format_is_zero_padded() {
        let mut panel = LogPanel::new(10);
        panel.push_at(at(9, 5, 3), "Unable to retrieve deliveriesinrange");
        assert_eq!(
            panel.latest().unwrap().to_string(),
            "2024-03-07 09:05:03 Unable to retrieve deliveriesinrange"
        );
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let mut panel = LogPanel::new(2);
        panel.log("first");
        panel.log("second");
        panel.log("third");

        let texts: Vec<&str> = panel.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second"]);
        assert!(panel.contains("sec"));
        assert!(!panel.contains("first"));
    }
}
