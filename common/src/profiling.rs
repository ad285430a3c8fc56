//! On-screen event log.
//!
//! The panel has no console, so range transitions, peripheral responses and
//! pressure alarms are kept as short text lines in a fixed ring buffer. The
//! footer shows the newest line; [`DebugLog::revision`] lets the caller redraw
//! it only when something was pushed.
//!
//! Time-based tick metrics live in the simulator, which has a clock.

use core::fmt::{self, Write};

use heapless::{Deque, String};

/// Lines kept in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per line. One footer row at the small font.
pub const LOG_LINE_LENGTH: usize = 64;

/// One log line.
pub type LogLine = String<LOG_LINE_LENGTH>;

/// Ring buffer of the most recent log lines, oldest first.
pub struct DebugLog {
    buffer: Deque<LogLine, LOG_BUFFER_SIZE>,
    revision: u32,
}

impl DebugLog {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            revision: 0,
        }
    }

    /// Append a line, dropping the oldest when full. Long lines are cut.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        let mut line = LogLine::new();
        Truncate(&mut line).write_str(msg).ok();
        self.push_line(line);
    }

    /// Append a formatted line, e.g. `log.push_fmt(format_args!("{label}: {state}"))`.
    pub fn push_fmt(
        &mut self,
        args: fmt::Arguments<'_>,
    ) {
        let mut line = LogLine::new();
        Truncate(&mut line).write_fmt(args).ok();
        self.push_line(line);
    }

    fn push_line(
        &mut self,
        line: LogLine,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(line).ok();
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(|l| l.as_str()) }

    /// Newest line.
    pub fn latest(&self) -> Option<&str> { self.buffer.back().map(|l| l.as_str()) }

    /// Bumped on every push.
    #[inline]
    pub const fn revision(&self) -> u32 { self.revision }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for DebugLog {
    fn default() -> Self { Self::new() }
}

/// Writer that keeps the prefix that fits instead of failing the whole write.
struct Truncate<'a>(&'a mut LogLine);

impl Write for Truncate<'_> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_latest() {
        let mut log = DebugLog::new();
        assert!(log.is_empty());
        assert_eq!(log.latest(), None);

        log.push("VOL: target OVER");
        log.push("bpm -> valid");
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest(), Some("bpm -> valid"));
        assert_eq!(log.iter().next(), Some("VOL: target OVER"));
    }

    #[test]
    fn test_ring_drops_oldest() {
        let mut log = DebugLog::new();
        for i in 0..=LOG_BUFFER_SIZE {
            log.push_fmt(format_args!("line {i}"));
        }
        assert_eq!(log.len(), LOG_BUFFER_SIZE);
        assert_eq!(log.iter().next(), Some("line 1"));
        assert_eq!(log.latest(), Some("line 8"));
    }

    #[test]
    fn test_long_lines_are_cut() {
        let mut log = DebugLog::new();
        let long = "x".repeat(LOG_LINE_LENGTH + 10);
        log.push(&long);
        assert_eq!(log.latest().map(str::len), Some(LOG_LINE_LENGTH));

        log.push_fmt(format_args!("{long}"));
        assert_eq!(log.latest().map(str::len), Some(LOG_LINE_LENGTH));
    }

    #[test]
    fn test_revision_counts_pushes() {
        let mut log = DebugLog::new();
        let start = log.revision();
        log.push("a");
        log.push_fmt(format_args!("{}", 2));
        assert_eq!(log.revision(), start.wrapping_add(2));
    }
}
