//! # ERP Wire Timestamps
//!
//! The ERP serializes timestamps as `/Date(1700000000000)/` - epoch
//! milliseconds wrapped in a legacy envelope. Notifications want something a
//! human can read, so the first integer run is extracted and rendered as UTC.

use chrono::DateTime;

/// Renders an ERP `/Date(ms)/` timestamp as `YYYY-MM-DD HH:MM:SS` UTC.
///
/// Inputs that carry no digits (or an out-of-range value) are passed through
/// unchanged rather than dropped - a raw timestamp in a notification beats a
/// missing one.
pub fn format_wire_timestamp(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let Ok(millis) = digits.parse::<i64>() else {
        return raw.to_string();
    };

    match DateTime::from_timestamp_millis(millis) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_envelope_is_unwrapped() {
        // 2023-11-14T22:13:20Z
        assert_eq!(
            format_wire_timestamp("/Date(1700000000000)/"),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn test_epoch() {
        assert_eq!(format_wire_timestamp("/Date(0)/"), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(format_wire_timestamp("yesterday"), "yesterday");
        assert_eq!(format_wire_timestamp(""), "");
    }

    #[test]
    fn test_bare_milliseconds() {
        assert_eq!(
            format_wire_timestamp("1700000000000"),
            "2023-11-14 22:13:20"
        );
    }
}
