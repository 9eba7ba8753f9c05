//! Calendar dates on the porkchop departure axis.
//!
//! Dates are whole days at 00:00 UTC; offsets are seconds past the reference epoch.

use chrono::{NaiveDate, TimeDelta};

use crate::ConfigError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ConfigError::Date {
        field,
        value: value.to_string(),
    })
}

/// Seconds from `epoch` to `date`.
pub fn offset_seconds(epoch: NaiveDate, date: NaiveDate) -> f64 {
    date.signed_duration_since(epoch).num_seconds() as f64
}

/// Calendar date reached `offset_s` seconds after `epoch`, rounded down to the day.
///
/// `None` when the offset is not finite or lands outside chrono's calendar.
pub fn date_at_offset(epoch: NaiveDate, offset_s: f64) -> Option<NaiveDate> {
    let days = (offset_s / 86_400.0).floor();
    if !days.is_finite() || days.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    TimeDelta::try_days(days as i64).and_then(|d| epoch.checked_add_signed(d))
}

/// `YYYY-MM-DD` label for an axis offset; empty when the date is out of range.
pub fn format_offset(epoch: NaiveDate, offset_s: f64) -> String {
    date_at_offset(epoch, offset_s)
        .map(format_date)
        .unwrap_or_default()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let date = parse_date("departure_start", "2030-01-01").unwrap();
        assert_eq!(format_date(date), "2030-01-01");
        assert!(parse_date("departure_start", "01/01/2030").is_err());
    }

    #[test]
    fn offsets_round_trip_through_dates() {
        let epoch = parse_date("reference_epoch", "2030-01-01").unwrap();
        let later = parse_date("departure_end", "2035-01-01").unwrap();
        let offset = offset_seconds(epoch, later);
        assert_eq!(offset, 1_826.0 * 86_400.0);
        assert_eq!(date_at_offset(epoch, offset), Some(later));
        assert_eq!(date_at_offset(epoch, offset - 1.0), later.pred_opt());
    }

    #[test]
    fn out_of_range_offsets_have_no_date() {
        let epoch = parse_date("reference_epoch", "2030-01-01").unwrap();
        assert_eq!(date_at_offset(epoch, 1.0e30), None);
        assert_eq!(date_at_offset(epoch, -1.0e30), None);
        assert_eq!(date_at_offset(epoch, 1.0e18), None);
        assert_eq!(date_at_offset(epoch, f64::NAN), None);
        assert_eq!(format_offset(epoch, f64::INFINITY), "");
        assert_eq!(format_offset(epoch, 86_400.0), "2030-01-02");
    }
}
