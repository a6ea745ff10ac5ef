//! Shared utility functions.

use crate::error::{EpiError, Result};
use chrono::NaiveDate;

/// Format used by the source data and the cache file names.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|err| {
        EpiError::validation(format!("Invalid date '{}': {}", input.trim(), err))
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Formats a date as `dd/mm/YYYY`, the form used in chart titles.
pub fn format_title_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parses a `#RRGGBB` colour into its components.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_iso_date("2020-03-10").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 3, 10).unwrap());
        assert_eq!(parse_iso_date(" 2020-03-10 ").unwrap(), date);
        assert!(parse_iso_date("10/03/2020").is_err());
    }

    #[test]
    fn test_format_dates() {
        let date = NaiveDate::from_ymd_opt(2020, 4, 7).unwrap();
        assert_eq!(format_iso_date(date), "2020-04-07");
        assert_eq!(format_title_date(date), "07/04/2020");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex_color("#1f77b4"), Some((31, 119, 180)));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("#ZZ0000"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
    }
}
