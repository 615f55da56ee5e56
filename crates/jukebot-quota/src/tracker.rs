// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily usage tracking with per-(scope, resource) caps.
//!
//! The tracker keeps in-memory counters keyed by scope and resource and
//! enforces a hard daily ceiling supplied by the caller on each check.
//! Counters are lazily reset the first time they are touched on a new
//! **UTC** day. There is no durable backing store: a process restart
//! silently resets all counters to zero (accepted trade-off).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use jukebot_core::ScopeId;
use tracing::{debug, info};

/// Usage counter for one (scope, resource) pair on one calendar day.
#[derive(Debug, Clone, Copy)]
struct DayCounter {
    /// The UTC day this counter applies to.
    day: NaiveDate,
    count: u32,
}

/// Shared daily-quota tracker.
///
/// One instance is shared across all concurrent command executions in the
/// process (dependency-injected, not global). `check_and_increment` is
/// effectively atomic: the counter map is guarded by a synchronous mutex
/// and there is no suspension point between the check and the increment.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    counters: Mutex<HashMap<(ScopeId, String), DayCounter>>,
}

impl QuotaTracker {
    /// Create a tracker with no counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether one more use of `resource` in `scope` is allowed today.
    ///
    /// If allowed, the day's counter is incremented before returning `true`.
    /// Returns `false` without incrementing once the counter has reached
    /// `limit`. The limit is supplied per call so policy can vary by caller;
    /// the counter only tracks usage.
    pub fn check_and_increment(&self, scope: &ScopeId, resource: &str, limit: u32) -> bool {
        self.check_and_increment_on(scope, resource, limit, Utc::now().date_naive())
    }

    /// Today's usage count for a (scope, resource) pair, if any.
    pub fn usage(&self, scope: &ScopeId, resource: &str) -> Option<u32> {
        self.usage_on(scope, resource, Utc::now().date_naive())
    }

    fn check_and_increment_on(
        &self,
        scope: &ScopeId,
        resource: &str,
        limit: u32,
        today: NaiveDate,
    ) -> bool {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let counter = counters
            .entry((scope.clone(), resource.to_string()))
            .or_insert(DayCounter {
                day: today,
                count: 0,
            });

        // Lazy reset: a counter for a previous day never carries over.
        if counter.day != today {
            counter.day = today;
            counter.count = 0;
        }

        if counter.count >= limit {
            info!(
                scope = %scope,
                resource = resource,
                limit = limit,
                "daily quota exhausted, denying"
            );
            return false;
        }

        counter.count += 1;
        debug!(
            scope = %scope,
            resource = resource,
            count = counter.count,
            limit = limit,
            "quota use recorded"
        );
        true
    }

    fn usage_on(&self, scope: &ScopeId, resource: &str, today: NaiveDate) -> Option<u32> {
        let counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        counters
            .get(&(scope.clone(), resource.to_string()))
            .map(|c| if c.day == today { c.count } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn four_calls_with_limit_three_yield_true_true_true_false() {
        let tracker = QuotaTracker::new();
        let scope = ScopeId("G1".into());
        let results: Vec<bool> = (0..4)
            .map(|_| tracker.check_and_increment(&scope, "gpt-image-1", 3))
            .collect();
        assert_eq!(results, vec![true, true, true, false]);
    }

    #[test]
    fn allowed_count_is_min_of_calls_and_limit() {
        let scope = ScopeId("G1".into());
        for (calls, limit) in [(1u32, 5u32), (5, 5), (20, 5), (0, 3)] {
            let tracker = QuotaTracker::new();
            let allowed = (0..calls)
                .filter(|_| tracker.check_and_increment(&scope, "res", limit))
                .count() as u32;
            assert_eq!(allowed, calls.min(limit), "calls={calls} limit={limit}");
        }
    }

    #[test]
    fn new_day_starts_at_zero_even_when_previous_day_saturated() {
        let tracker = QuotaTracker::new();
        let scope = ScopeId("G1".into());
        let d1 = day("2026-03-01");
        let d2 = day("2026-03-02");

        // Saturate day one.
        for _ in 0..3 {
            assert!(tracker.check_and_increment_on(&scope, "gpt-image-1", 3, d1));
        }
        assert!(!tracker.check_and_increment_on(&scope, "gpt-image-1", 3, d1));

        // Day two is allowed again and usage restarts from zero.
        assert!(tracker.check_and_increment_on(&scope, "gpt-image-1", 3, d2));
        assert_eq!(tracker.usage_on(&scope, "gpt-image-1", d2), Some(1));
    }

    #[test]
    fn counters_are_independent_across_scopes_and_resources() {
        let tracker = QuotaTracker::new();
        let g1 = ScopeId("G1".into());
        let g2 = ScopeId("G2".into());

        assert!(tracker.check_and_increment(&g1, "gpt-image-1", 1));
        assert!(!tracker.check_and_increment(&g1, "gpt-image-1", 1));

        // A different scope has its own counter.
        assert!(tracker.check_and_increment(&g2, "gpt-image-1", 1));
        // A different resource in the saturated scope has its own counter.
        assert!(tracker.check_and_increment(&g1, "sora-2", 1));
    }

    #[test]
    fn usage_reports_todays_count() {
        let tracker = QuotaTracker::new();
        let scope = ScopeId("G1".into());
        assert_eq!(tracker.usage(&scope, "gpt-image-1"), None);
        tracker.check_and_increment(&scope, "gpt-image-1", 5);
        tracker.check_and_increment(&scope, "gpt-image-1", 5);
        assert_eq!(tracker.usage(&scope, "gpt-image-1"), Some(2));
    }

    #[test]
    fn usage_for_stale_counter_reads_zero() {
        let tracker = QuotaTracker::new();
        let scope = ScopeId("G1".into());
        let d1 = day("2026-03-01");
        let d2 = day("2026-03-02");
        tracker.check_and_increment_on(&scope, "gpt-image-1", 3, d1);
        assert_eq!(tracker.usage_on(&scope, "gpt-image-1", d2), Some(0));
    }

    #[test]
    fn concurrent_checks_admit_exactly_the_limit() {
        let tracker = Arc::new(QuotaTracker::new());
        let scope = ScopeId("G1".into());
        let limit = 25u32;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let tracker = Arc::clone(&tracker);
            let scope = scope.clone();
            handles.push(std::thread::spawn(move || {
                (0..10)
                    .filter(|_| tracker.check_and_increment(&scope, "gpt-image-1", limit))
                    .count()
            }));
        }

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed as u32, limit, "no interleaving between check and increment");
    }
}
