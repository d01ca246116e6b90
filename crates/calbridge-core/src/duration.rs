//! Wire durations.
//!
//! Durations travel as the hour/minute/second subset of ISO 8601
//! (`PT1H30M`, `PT0S`). Parsing is a lenient left-to-right scan that never
//! fails: digit runs followed by `H`, `M` or `S` accumulate, everything else
//! is skipped.

use tracing::warn;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Formats a number of seconds as a wire duration.
///
/// Negative input is clamped to `PT0S`.
///
/// # Example
///
/// ```
/// use calbridge_core::duration::format_duration;
///
/// assert_eq!(format_duration(5400), "PT1H30M");
/// assert_eq!(format_duration(0), "PT0S");
/// ```
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        warn!(seconds, "Negative duration clamped to PT0S");
        return "PT0S".to_string();
    }

    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if secs > 0 {
        out.push_str(&format!("{}S", secs));
    }
    if hours == 0 && minutes == 0 && secs == 0 {
        out.push_str("0S");
    }
    out
}

/// Parses a wire duration into seconds.
///
/// No grammar is enforced: `P`, `T` and unknown letters are skipped, and a
/// digit run only counts when the very next character is `H`, `M` or `S`.
/// Completely non-conforming input yields zero. Digit runs too large for an
/// `i64` saturate.
///
/// # Example
///
/// ```
/// use calbridge_core::duration::parse_duration;
///
/// assert_eq!(parse_duration("PT1H30M"), 5400);
/// assert_eq!(parse_duration("garbage"), 0);
/// ```
pub fn parse_duration(input: &str) -> i64 {
    let bytes = input.as_bytes();
    let mut total: i64 = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        let multiplier = match bytes.get(i) {
            Some(b'H') => SECONDS_PER_HOUR,
            Some(b'M') => SECONDS_PER_MINUTE,
            Some(b'S') => 1,
            _ => continue,
        };
        i += 1;

        // The run is pure ASCII digits, so parsing only fails on overflow.
        let value = input[run_start..i - 1].parse::<i64>().unwrap_or(i64::MAX);
        total = total.saturating_add(value.saturating_mul(multiplier));
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    mod format {
        use super::*;

        #[test]
        fn zero() {
            assert_eq!(format_duration(0), "PT0S");
        }

        #[test]
        fn components_in_order() {
            assert_eq!(format_duration(5400), "PT1H30M");
            assert_eq!(format_duration(3661), "PT1H1M1S");
            assert_eq!(format_duration(1800), "PT30M");
            assert_eq!(format_duration(45), "PT45S");
            assert_eq!(format_duration(7200), "PT2H");
            assert_eq!(format_duration(3605), "PT1H5S");
        }

        #[test]
        fn days_stay_in_hours() {
            assert_eq!(format_duration(2 * 86_400), "PT48H");
        }

        #[test]
        fn negative_clamps_to_zero() {
            assert_eq!(format_duration(-1800), "PT0S");
            assert_eq!(format_duration(i64::MIN), "PT0S");
        }
    }

    mod parse {
        use super::*;

        #[test]
        fn well_formed() {
            assert_eq!(parse_duration("PT1H30M"), 5400);
            assert_eq!(parse_duration("PT0S"), 0);
            assert_eq!(parse_duration("PT1H1M1S"), 3661);
            assert_eq!(parse_duration("PT45S"), 45);
        }

        #[test]
        fn lenient_scan() {
            // Components may repeat or come out of order.
            assert_eq!(parse_duration("PT30M1H"), 5400);
            assert_eq!(parse_duration("PT1H1H"), 7200);
            // Day and week designators are not understood and are skipped.
            assert_eq!(parse_duration("P1DT2H"), 7200);
            assert_eq!(parse_duration("P2W"), 0);
            // A sign is just another skipped character.
            assert_eq!(parse_duration("-PT15M"), 900);
        }

        #[test]
        fn non_conforming_input_is_zero() {
            assert_eq!(parse_duration(""), 0);
            assert_eq!(parse_duration("garbage"), 0);
            assert_eq!(parse_duration("PT"), 0);
            assert_eq!(parse_duration("12"), 0);
        }

        #[test]
        fn unit_must_follow_digits_directly() {
            assert_eq!(parse_duration("PT1 H"), 0);
            assert_eq!(parse_duration("PT1h"), 0);
            assert_eq!(parse_duration("PT1X2M"), 120);
        }

        #[test]
        fn overflow_saturates() {
            assert_eq!(parse_duration("PT99999999999999999999H"), i64::MAX);
            assert_eq!(parse_duration("PT9223372036854775807H1S"), i64::MAX);
        }
    }

    #[test]
    fn roundtrip_non_negative() {
        for seconds in [0, 1, 59, 60, 61, 1800, 3599, 3600, 5400, 86_399, 86_400, 1_000_000] {
            assert_eq!(
                parse_duration(&format_duration(seconds)),
                seconds,
                "roundtrip failed for {seconds}"
            );
        }
    }
}
