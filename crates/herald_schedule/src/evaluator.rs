//! Classification of content items against their weekly posting slot.

use crate::{BestTime, Clock};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::sync::Arc;
use tracing::warn;

/// How a best-time slot relates to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Due {
    /// Another day, or more than an hour ahead
    #[display("not_due")]
    NotDue,
    /// The slot's hour, or the hour before it
    #[display("due_for_review")]
    DueForReview,
    /// Same day, slot hour already passed
    #[display("past_due")]
    PastDue,
}

impl Due {
    /// Items in either due state are shown to reviewers.
    pub fn is_review_due(&self) -> bool {
        matches!(self, Due::DueForReview | Due::PastDue)
    }
}

/// Classify a parsed slot.
pub fn classify(slot: &BestTime, now: NaiveDateTime) -> Due {
    if now.weekday() != *slot.weekday() {
        return Due::NotDue;
    }
    let current = now.hour();
    let scheduled = *slot.hour();
    if current > scheduled {
        Due::PastDue
    } else if current == scheduled || current + 1 == scheduled {
        Due::DueForReview
    } else {
        Due::NotDue
    }
}

/// Classify a best-time string. Unparseable strings are logged and never due.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use herald_schedule::{Due, is_due};
///
/// // 2024-01-01 is a Monday.
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(is_due("Monday 9AM", monday.and_hms_opt(8, 30, 0).unwrap()), Due::DueForReview);
/// assert_eq!(is_due("Monday 9AM", monday.and_hms_opt(10, 15, 0).unwrap()), Due::PastDue);
/// assert_eq!(is_due("someday", monday.and_hms_opt(9, 0, 0).unwrap()), Due::NotDue);
/// ```
pub fn is_due(best_time: &str, now: NaiveDateTime) -> Due {
    match best_time.parse::<BestTime>() {
        Ok(slot) => classify(&slot, now),
        Err(e) => {
            warn!(error = %e, "Skipping item with malformed best time");
            Due::NotDue
        }
    }
}

/// Whether an approved item should be published now.
///
/// Auto-posting waits for the slot hour itself, while review opens an hour
/// earlier.
pub fn is_auto_post_due(best_time: &str, now: NaiveDateTime) -> bool {
    match best_time.parse::<BestTime>() {
        Ok(slot) => match classify(&slot, now) {
            Due::PastDue => true,
            Due::DueForReview => now.hour() == *slot.hour(),
            Due::NotDue => false,
        },
        Err(e) => {
            warn!(error = %e, "Skipping item with malformed best time");
            false
        }
    }
}

/// Evaluates best-time strings against a configured clock.
#[derive(Clone)]
pub struct ScheduleEvaluator {
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ScheduleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleEvaluator")
            .field("now", &self.clock.now())
            .finish()
    }
}

impl ScheduleEvaluator {
    /// Create an evaluator reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current wall-clock time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Classify `best_time` against the current time.
    pub fn is_due(&self, best_time: &str) -> Due {
        is_due(best_time, self.now())
    }

    /// Whether an approved item with `best_time` should be published now.
    pub fn is_auto_post_due(&self, best_time: &str) -> bool {
        is_auto_post_due(best_time, self.now())
    }
}
