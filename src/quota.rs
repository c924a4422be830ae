//! Sliding-window action quota tracking.
//!
//! Each user gets a rolling one-hour window of catch attempts, with
//! capacity decided by the equipped rod. The log is process-lifetime
//! only: a restart clears it and everyone starts a fresh window. That is
//! documented behavior, not an oversight (see DESIGN.md).

use crate::constants::QUOTA_WINDOW_SECONDS;
use std::collections::HashMap;

/// Outcome of a quota check. Checking never consumes a slot; callers
/// confirm the action first and then call [`QuotaTracker::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Under capacity; `remaining` slots left after this action.
    Admitted { remaining: usize },
    /// At capacity; the oldest in-window entry expires in `wait_minutes`
    /// whole minutes (rounded down).
    Rejected { wait_minutes: i64 },
}

/// Per-user append-only timestamp log, pruned lazily to the window.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    log: HashMap<String, Vec<i64>>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prunes the user's log to the current window and decides admission
    /// against `capacity`. Does not record the action.
    pub fn check(&mut self, user_id: &str, now: i64, capacity: usize) -> QuotaDecision {
        let entries = self.log.entry(user_id.to_string()).or_default();
        entries.retain(|&ts| now - ts < QUOTA_WINDOW_SECONDS);

        if entries.len() < capacity {
            QuotaDecision::Admitted {
                remaining: capacity - entries.len(),
            }
        } else {
            // Non-empty here: capacity is at least 1 slot in practice, and
            // an empty log is always admitted above.
            let oldest = entries.iter().copied().min().unwrap_or(now);
            let wait_seconds = (oldest + QUOTA_WINDOW_SECONDS - now).max(0);
            QuotaDecision::Rejected {
                wait_minutes: wait_seconds / 60,
            }
        }
    }

    /// Records an admitted action. Call only after the downstream action
    /// is confirmed to proceed, so rejected attempts never count.
    pub fn record(&mut self, user_id: &str, now: i64) {
        self.log.entry(user_id.to_string()).or_default().push(now);
    }

    /// In-window action count, after pruning.
    pub fn count(&mut self, user_id: &str, now: i64) -> usize {
        let entries = self.log.entry(user_id.to_string()).or_default();
        entries.retain(|&ts| now - ts < QUOTA_WINDOW_SECONDS);
        entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn fill(tracker: &mut QuotaTracker, user: &str, at: i64, n: usize) {
        for _ in 0..n {
            tracker.record(user, at);
        }
    }

    #[test]
    fn test_admits_up_to_capacity() {
        let mut tracker = QuotaTracker::new();
        for i in 0..3 {
            match tracker.check("u1", T, 3) {
                QuotaDecision::Admitted { remaining } => {
                    assert_eq!(remaining, 3 - i, "remaining slots before action {}", i)
                }
                QuotaDecision::Rejected { .. } => panic!("action {} should be admitted", i),
            }
            tracker.record("u1", T);
        }
    }

    #[test]
    fn test_rejects_at_capacity_within_window() {
        let mut tracker = QuotaTracker::new();
        fill(&mut tracker, "u1", T, 3);

        // Anywhere inside the window the fourth attempt is rejected.
        for offset in [0, 1, 1800, QUOTA_WINDOW_SECONDS - 1] {
            assert!(
                matches!(tracker.check("u1", T + offset, 3), QuotaDecision::Rejected { .. }),
                "attempt at T+{} should be rejected",
                offset
            );
        }
    }

    #[test]
    fn test_admits_after_window_expires() {
        let mut tracker = QuotaTracker::new();
        fill(&mut tracker, "u1", T, 3);

        assert!(matches!(
            tracker.check("u1", T + QUOTA_WINDOW_SECONDS, 3),
            QuotaDecision::Admitted { .. }
        ));
    }

    #[test]
    fn test_wait_minutes_counts_down_to_oldest_expiry() {
        let mut tracker = QuotaTracker::new();
        fill(&mut tracker, "u1", T, 3);

        // One minute in: the oldest entry expires in 59 whole minutes.
        match tracker.check("u1", T + 60, 3) {
            QuotaDecision::Rejected { wait_minutes } => assert_eq!(wait_minutes, 59),
            QuotaDecision::Admitted { .. } => panic!("should be rejected"),
        }

        // 59.5 minutes in: 30 seconds left rounds down to 0.
        match tracker.check("u1", T + QUOTA_WINDOW_SECONDS - 30, 3) {
            QuotaDecision::Rejected { wait_minutes } => assert_eq!(wait_minutes, 0),
            QuotaDecision::Admitted { .. } => panic!("should be rejected"),
        }
    }

    #[test]
    fn test_wait_tracks_oldest_entry_with_staggered_log() {
        let mut tracker = QuotaTracker::new();
        tracker.record("u1", T);
        tracker.record("u1", T + 600);
        tracker.record("u1", T + 1200);

        // At T+1800 the oldest entry (T) has 30 minutes left.
        match tracker.check("u1", T + 1800, 3) {
            QuotaDecision::Rejected { wait_minutes } => assert_eq!(wait_minutes, 30),
            QuotaDecision::Admitted { .. } => panic!("should be rejected"),
        }

        // Once the oldest expires, one slot frees up even though the other
        // two entries are still in-window.
        assert!(matches!(
            tracker.check("u1", T + QUOTA_WINDOW_SECONDS, 3),
            QuotaDecision::Admitted { remaining: 1 }
        ));
    }

    #[test]
    fn test_check_does_not_consume_a_slot() {
        let mut tracker = QuotaTracker::new();
        for _ in 0..10 {
            assert!(matches!(
                tracker.check("u1", T, 3),
                QuotaDecision::Admitted { remaining: 3 }
            ));
        }
        assert_eq!(tracker.count("u1", T), 0);
    }

    #[test]
    fn test_users_are_tracked_independently() {
        let mut tracker = QuotaTracker::new();
        fill(&mut tracker, "u1", T, 3);

        assert!(matches!(tracker.check("u1", T, 3), QuotaDecision::Rejected { .. }));
        assert!(matches!(
            tracker.check("u2", T, 3),
            QuotaDecision::Admitted { remaining: 3 }
        ));
    }

    #[test]
    fn test_capacity_reflects_rod_bonus() {
        let mut tracker = QuotaTracker::new();
        fill(&mut tracker, "u1", T, 3);

        // Same log, larger capacity (e.g. Golden Rod): still admitted.
        assert!(matches!(
            tracker.check("u1", T, 5),
            QuotaDecision::Admitted { remaining: 2 }
        ));
    }
}
