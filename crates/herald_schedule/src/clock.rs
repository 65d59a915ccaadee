//! Wall-clock sources for schedule evaluation.

use chrono::{FixedOffset, Local, NaiveDateTime, Utc};

/// Source of the wall-clock time that best-time strings are compared with.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The host clock, optionally pinned to a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Use the host's local time zone.
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Use a fixed offset from UTC, in minutes east. Out-of-range offsets
    /// fall back to the host time zone.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes.saturating_mul(60));
        if offset.is_none() {
            tracing::warn!(minutes, "UTC offset out of range, using local time");
        }
        Self { offset }
    }

    /// Build from an optional configured offset.
    pub fn from_config(utc_offset_minutes: Option<i32>) -> Self {
        utc_offset_minutes
            .map(Self::with_offset_minutes)
            .unwrap_or_default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
