//! Clock and date formatting.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Check that a strftime pattern has no invalid specifiers.
pub fn validate_date_format(spec: &str) -> Result<(), String> {
    if spec.trim().is_empty() {
        return Err("date format is empty".to_string());
    }
    if StrftimeItems::new(spec).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid date format: {spec:?}"));
    }
    Ok(())
}

/// Format a timestamp with a strftime pattern.
///
/// Invalid patterns fall back to ISO `%Y-%m-%d` instead of panicking.
#[must_use]
pub fn format_date(dt: &DateTime<Local>, spec: &str) -> String {
    let mut out = String::new();
    if validate_date_format(spec).is_ok() && write!(out, "{}", dt.format(spec)).is_ok() {
        return out;
    }
    tracing::warn!(
        component = "clock",
        category = "Invalid Format",
        format = spec,
        "Falling back to ISO date"
    );
    dt.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, 13, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&sample(), "%Y-%m-%d"), "2025-09-13");
        assert_eq!(format_date(&sample(), "%d/%m/%Y"), "13/09/2025");
    }

    #[test]
    fn test_invalid_format_falls_back() {
        assert_eq!(format_date(&sample(), "%Q"), "2025-09-13");
    }

    #[test]
    fn test_validate_date_format() {
        assert!(validate_date_format("%B %d, %Y").is_ok());
        assert!(validate_date_format("%Q").is_err());
        assert!(validate_date_format("").is_err());
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(sample()).now(), sample());
    }
}
