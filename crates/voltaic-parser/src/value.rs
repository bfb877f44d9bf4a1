//! SPICE numeric literals with SI suffixes.
//!
//! `1k`, `2.5MEG`, `100u`, `1e-3`, `10uF` — suffixes are case-insensitive,
//! `MEG` outranks the milli `m`, and trailing dimension letters (`Ohm`,
//! `F`, `V`) are ignored.

use crate::error::{Error, Result};

/// Parse a SPICE number, returning its value in base units.
pub fn parse_value(s: &str) -> Result<f64> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return Err(Error::InvalidValue(s.to_string()));
    }
    // An exponent only counts when digits actually follow; otherwise the
    // `e` belongs to a suffix or dimension (`5e` is not a number, `5eV` is
    // 5 with a dimension).
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                cursor += 1;
            }
            end = cursor;
        }
    }

    let mantissa: f64 = s[..end]
        .parse()
        .map_err(|_| Error::InvalidValue(s.to_string()))?;

    let suffix = &s[end..];
    if suffix.is_empty() {
        return Ok(mantissa);
    }
    if !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidValue(s.to_string()));
    }

    let upper = suffix.to_ascii_uppercase();
    let scale = if upper.starts_with("MEG") {
        1e6
    } else {
        match upper.as_bytes()[0] {
            b'T' => 1e12,
            b'G' => 1e9,
            b'K' => 1e3,
            b'M' => 1e-3,
            b'U' => 1e-6,
            b'N' => 1e-9,
            b'P' => 1e-12,
            b'F' => 1e-15,
            _ => 1.0, // bare dimension letter, e.g. "5V"
        }
    };
    Ok(mantissa * scale)
}
