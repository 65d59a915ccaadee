//! Parsing of `"<Weekday> <H>AM|PM"` schedule strings.

use chrono::Weekday;
use herald_error::ScheduleError;
use serde::{Deserialize, Serialize};

/// Weekly posting slot: a weekday and an hour of the day.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use herald_schedule::BestTime;
///
/// let slot: BestTime = "Monday 9AM".parse().unwrap();
/// assert_eq!(*slot.weekday(), Weekday::Mon);
/// assert_eq!(*slot.hour(), 9);
///
/// let midnight: BestTime = "friday 12AM".parse().unwrap();
/// assert_eq!(*midnight.hour(), 0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct BestTime {
    weekday: Weekday,
    /// Hour of the day, 0-23
    hour: u32,
}

impl BestTime {
    /// Create a slot. Hours beyond 23 are rejected.
    pub fn new(weekday: Weekday, hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { weekday, hour })
    }
}

impl std::fmt::Display for BestTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (display_hour, suffix) = match self.hour {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{} {}{}", weekday_name(self.weekday), display_hour, suffix)
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl std::str::FromStr for BestTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(day), Some(first)) = (parts.next(), parts.next()) else {
            return Err(ScheduleError::new(s, "expected '<Weekday> <H>AM|PM'"));
        };
        // "9 AM" splits into two tokens; anything after the clock ("EST") is ignored.
        let mut clock = first.to_string();
        let suffix = parts
            .next()
            .filter(|t| t.eq_ignore_ascii_case("AM") || t.eq_ignore_ascii_case("PM"));
        if let Some(suffix) = suffix {
            clock.push_str(suffix);
        }

        let weekday = day
            .parse::<Weekday>()
            .map_err(|_| ScheduleError::new(s, format!("unknown weekday '{}'", day)))?;

        let upper = clock.to_ascii_uppercase();
        let (digits, pm) = if let Some(d) = upper.strip_suffix("AM") {
            (d, false)
        } else if let Some(d) = upper.strip_suffix("PM") {
            (d, true)
        } else {
            return Err(ScheduleError::new(s, "missing AM/PM suffix"));
        };

        let hour: u32 = digits
            .parse()
            .map_err(|_| ScheduleError::new(s, format!("invalid hour '{}'", digits)))?;
        if !(1..=12).contains(&hour) {
            return Err(ScheduleError::new(s, "hour must be between 1 and 12"));
        }

        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Ok(Self { weekday, hour })
    }
}
