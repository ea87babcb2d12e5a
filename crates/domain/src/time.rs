//! Durations and times of day as the rule runtime expects them.

use std::fmt;

use chrono::NaiveTime;
use serde::{Serialize, Serializer};

use crate::error::NumericFieldError;

/// Default dwell before a new mode is committed.
pub const DEFAULT_DWELL_SECONDS: u32 = 300;

/// A strictly positive number of seconds, rendered as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DwellDuration(u32);

impl DwellDuration {
    /// # Errors
    ///
    /// Returns [`NumericFieldError`] for `dwell_seconds` when `seconds` is zero.
    pub fn from_secs(seconds: u32) -> Result<Self, NumericFieldError> {
        if seconds == 0 {
            return Err(NumericFieldError {
                field: "dwell_seconds".to_string(),
                value: seconds.to_string(),
                expected: "a positive integer",
            });
        }
        Ok(Self(seconds))
    }

    #[must_use]
    pub fn as_secs(self) -> u32 {
        self.0
    }
}

impl Default for DwellDuration {
    fn default() -> Self {
        Self(DEFAULT_DWELL_SECONDS)
    }
}

impl fmt::Display for DwellDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hms(self.0))
    }
}

impl Serialize for DwellDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Format a number of seconds as `HH:MM:SS`; hours are not wrapped at 24.
#[must_use]
pub fn hms(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Time of day at which the once-daily flourish flag is cleared.
#[must_use]
pub fn flourish_reset_time() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 5).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_five_minutes() {
        assert_eq!(DwellDuration::default().as_secs(), 300);
        assert_eq!(DwellDuration::default().to_string(), "00:05:00");
    }

    #[test]
    fn should_reject_zero_seconds() {
        let err = DwellDuration::from_secs(0).unwrap_err();
        assert_eq!(err.field, "dwell_seconds");
    }

    #[test]
    fn should_carry_minutes_into_hours() {
        assert_eq!(hms(3600), "01:00:00");
        assert_eq!(hms(4530), "01:15:30");
        assert_eq!(hms(59), "00:00:59");
    }

    #[test]
    fn should_serialize_duration_as_hms_string() {
        let d = DwellDuration::from_secs(90).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"00:01:30\"");
    }

    #[test]
    fn should_reset_flourish_five_seconds_after_midnight() {
        assert_eq!(flourish_reset_time().to_string(), "00:00:05");
    }
}
