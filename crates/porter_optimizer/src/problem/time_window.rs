use std::cmp;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Service window for an order line. Both bounds optional; the end bound is
/// the pick deadline.
#[derive(Deserialize, Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindow {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        TimeWindow { start, end }
    }

    pub fn deadline(end: Timestamp) -> Self {
        TimeWindow {
            start: None,
            end: Some(end),
        }
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_satisfied(&self, arrival: Timestamp) -> bool {
        match self.end {
            Some(end) => arrival <= end,
            None => true,
        }
    }

    /// Seconds by which `arrival` misses the deadline, zero when on time.
    pub fn overtime(&self, arrival: Timestamp) -> i64 {
        match self.end {
            Some(end) => cmp::max(arrival.as_second() - end.as_second(), 0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overtime() {
        let window = TimeWindow::deadline("2026-03-02T10:00:00Z".parse().unwrap());

        assert_eq!(window.overtime("2026-03-02T09:59:00Z".parse().unwrap()), 0);
        assert_eq!(window.overtime("2026-03-02T10:05:00Z".parse().unwrap()), 300);
        assert!(window.is_satisfied("2026-03-02T10:00:00Z".parse().unwrap()));
        assert!(!window.is_satisfied("2026-03-02T10:00:01Z".parse().unwrap()));
    }

    #[test]
    fn test_unbounded_window() {
        let window = TimeWindow::default();
        assert!(window.is_empty());
        assert!(window.is_satisfied(Timestamp::UNIX_EPOCH));
        assert_eq!(window.overtime(Timestamp::UNIX_EPOCH), 0);
    }
}
