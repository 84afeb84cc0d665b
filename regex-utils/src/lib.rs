//! Regex utilities for schedule-lens
//! Compiled once and shared by the schedule file parser

use once_cell::sync::Lazy;
use regex::Regex;

/// ISO-8601 duration literals as written by project-schedule XML (`PT8H0M0S`)
pub mod duration {
    use super::*;

    pub static ISO_PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("Invalid regex pattern")
    });

    /// Components of a parsed duration literal
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct IsoDuration {
        pub days: f64,
        pub hours: f64,
        pub minutes: f64,
        pub seconds: f64,
    }

    impl IsoDuration {
        /// Total length in minutes, counting a day as `minutes_per_day`
        pub fn total_minutes(&self, minutes_per_day: f64) -> f64 {
            self.days * minutes_per_day + self.hours * 60.0 + self.minutes + self.seconds / 60.0
        }
    }

    /// Parse a duration literal. Returns `None` for anything that is not of
    /// the `P[nD][T[nH][nM][nS]]` shape.
    pub fn parse(text: &str) -> Option<IsoDuration> {
        let text = text.trim();
        if text == "P" || text.ends_with('T') {
            return None;
        }
        let caps = ISO_PATTERN.captures(text)?;
        let part = |idx: usize| -> Option<f64> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse::<f64>().ok(),
                None => Some(0.0),
            }
        };

        Some(IsoDuration {
            days: part(1)?,
            hours: part(2)?,
            minutes: part(3)?,
            seconds: part(4)?,
        })
    }
}

/// Timestamp helpers
pub mod timestamp {
    use super::*;

    pub static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
            .expect("Invalid regex pattern")
    });

    /// Split a `YYYY-MM-DD[THH:MM[:SS]]` literal into its date part and an
    /// optional time part.
    pub fn split(text: &str) -> Option<(&str, Option<&str>)> {
        let text = text.trim();
        let caps = DATE_PREFIX.captures(text)?;
        let date = caps.get(1)?.as_str();
        let rest = &text[date.len()..];
        if rest.is_empty() {
            Some((date, None))
        } else {
            Some((date, Some(&rest[1..])))
        }
    }
}
