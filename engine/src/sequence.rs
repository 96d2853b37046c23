//! Monotonic tokens for detecting stale asynchronous results.
//!
//! Every asynchronous continuation that wants to touch shared state carries
//! a token issued before it suspended. When it resumes, it compares that token
//! with the newest one issued; anything older has been superseded.

use serde::{Deserialize, Serialize};

/// Sequence number attached to a reorder attempt or mutation.
pub type Sequence = u64;

/// Generation number attached to a debounced keystroke.
pub type Generation = u64;

/// Issues strictly increasing sequence numbers and remembers the latest.
///
/// Ordering rules:
/// 1. The first issued value is 1, so 0 never names a real attempt
/// 2. Only the most recently issued value is current
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceTracker {
    /// Highest sequence issued so far
    latest: Sequence,
}

impl SequenceTracker {
    /// Create a tracker that has not issued anything yet.
    pub fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue the next sequence number.
    pub fn issue(&mut self) -> Sequence {
        self.latest += 1;
        self.latest
    }

    /// Highest sequence issued so far (0 if none).
    pub fn latest(&self) -> Sequence {
        self.latest
    }

    /// Whether `sequence` is still the newest one issued.
    pub fn is_current(&self, sequence: Sequence) -> bool {
        sequence != 0 && sequence == self.latest
    }

    /// Whether a newer sequence has been issued after `sequence`.
    pub fn is_superseded(&self, sequence: Sequence) -> bool {
        sequence < self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tracker_starts_at_zero() {
        let tracker = SequenceTracker::new();
        assert_eq!(tracker.latest(), 0);
        assert!(!tracker.is_current(0));
    }

    #[test]
    fn issue_increments() {
        let mut tracker = SequenceTracker::new();
        assert_eq!(tracker.issue(), 1);
        assert_eq!(tracker.issue(), 2);
        assert_eq!(tracker.latest(), 2);
    }

    #[test]
    fn only_latest_is_current() {
        let mut tracker = SequenceTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_current(first));

        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_superseded(first));
        assert!(tracker.is_current(second));
        assert!(!tracker.is_superseded(second));
    }
}
