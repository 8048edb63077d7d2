//! Parsers for declarative animation attributes (`data-phrases`,
//! `data-percent`, `data-target`).
//!
//! Attribute values arrive as raw strings (or absent). Absent values map to
//! the empty/zero default; malformed values are reported as [`ParamError`]
//! so the caller can log and fall back.

use crate::error::ParamError;

/// Parse a JSON-encoded array of strings. Absent or blank input is an empty list.
pub fn parse_phrases(raw: Option<&str>) -> Result<Vec<String>, ParamError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(s) => s,
    };
    serde_json::from_str::<Vec<String>>(raw).map_err(|e| ParamError::InvalidPhrases {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a progress target. Leading integer digits are taken (so `"75%"` is 75)
/// and the result is clamped into [0, 100]. Absent input is 0.
pub fn parse_percent(raw: Option<&str>) -> Result<u8, ParamError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let value = leading_int(raw).ok_or_else(|| ParamError::InvalidNumber {
        attribute: "data-percent",
        raw: raw.to_string(),
    })?;
    Ok(value.clamp(0, 100) as u8)
}

/// Parse a counter target. The whole (trimmed) value must be a non-negative
/// integer; blank or absent input is 0.
pub fn parse_counter_target(raw: Option<&str>) -> Result<u64, ParamError> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Ok(0);
    }
    let invalid = || ParamError::InvalidNumber {
        attribute: "data-target",
        raw: trimmed.to_string(),
    };
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(n);
    }
    // Accept integral float spellings such as "120.0" or "1e3".
    let f: f64 = trimmed.parse().map_err(|_| invalid())?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(invalid())
    }
}

/// Whether a counter's initial text carries a percent sign that must survive animation.
pub fn has_percent_suffix(text: &str) -> bool {
    text.contains('%')
}

/// Optional sign followed by ASCII digits, after leading whitespace. Trailing text is ignored.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs; the caller clamps anyway.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_default_to_empty() {
        assert_eq!(parse_phrases(None), Ok(vec![]));
        assert_eq!(parse_phrases(Some("   ")), Ok(vec![]));
        assert_eq!(
            parse_phrases(Some(r#"["Analyst", "Engineer"]"#)).unwrap(),
            vec!["Analyst".to_string(), "Engineer".to_string()]
        );
    }

    #[test]
    fn phrases_reject_malformed_json() {
        assert!(matches!(
            parse_phrases(Some("['single quotes']")),
            Err(ParamError::InvalidPhrases { .. })
        ));
        assert!(parse_phrases(Some("[1, 2]")).is_err());
    }

    #[test]
    fn percent_takes_leading_digits_and_clamps() {
        assert_eq!(parse_percent(Some("75")), Ok(75));
        assert_eq!(parse_percent(Some(" 75%")), Ok(75));
        assert_eq!(parse_percent(Some("140")), Ok(100));
        assert_eq!(parse_percent(Some("-5")), Ok(0));
        assert_eq!(parse_percent(None), Ok(0));
        assert!(parse_percent(Some("abc")).is_err());
        assert!(parse_percent(Some("")).is_err());
    }

    #[test]
    fn counter_target_requires_whole_number() {
        assert_eq!(parse_counter_target(Some("120")), Ok(120));
        assert_eq!(parse_counter_target(Some(" 15 ")), Ok(15));
        assert_eq!(parse_counter_target(Some("1e3")), Ok(1000));
        assert_eq!(parse_counter_target(None), Ok(0));
        assert_eq!(parse_counter_target(Some("")), Ok(0));
        assert!(parse_counter_target(Some("12px")).is_err());
        assert!(parse_counter_target(Some("4.5")).is_err());
        assert!(parse_counter_target(Some("-3")).is_err());
    }

    #[test]
    fn suffix_detection() {
        assert!(has_percent_suffix("0%"));
        assert!(!has_percent_suffix("0"));
    }
}
