//! Stateless checks applied to user supplied todo fields.
use chrono::{DateTime, NaiveDateTime};

/// Local (offset-less) timestamp layouts accepted for due dates.
const LOCAL_TIMESTAMP_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Error type for rejected todo input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title was empty after trimming whitespace.
    #[error("Title must not be empty")]
    EmptyTitle,
    /// The due date did not match any accepted timestamp layout.
    #[error("Invalid date format: '{0}'")]
    InvalidDueAt(String),
}

/// Returns `true` if `s` is an ISO 8601 style timestamp in one of the accepted layouts:
/// RFC 3339 with an offset, local date and time with seconds, or local date and time
/// with minute precision.
///
/// Every layout starts with a fixed width `YYYY-MM-DDTHH:MM` prefix and uses an
/// uppercase `T` separator. An offset is either an uppercase `Z` or `+HH:MM`/`-HH:MM`.
pub fn is_valid_timestamp(s: &str) -> bool {
    if !has_fixed_layout(s) {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || LOCAL_TIMESTAMP_LAYOUTS
            .iter()
            .any(|layout| NaiveDateTime::parse_from_str(s, layout).is_ok())
}

/// Checks the character layout only; field ranges are left to chrono.
fn has_fixed_layout(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 16 {
        return false;
    }
    let (date_time, rest) = bytes.split_at(16);
    let prefix_ok = date_time.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    prefix_ok && has_valid_suffix(rest)
}

/// Accepts nothing, or `:SS` followed by an optional fraction and an optional offset.
fn has_valid_suffix(rest: &[u8]) -> bool {
    let rest = match rest {
        [] => return true,
        [b':', s1, s2, rest @ ..] if s1.is_ascii_digit() && s2.is_ascii_digit() => rest,
        _ => return false,
    };
    let rest = match rest {
        [b'.', fraction @ ..] => {
            let digits = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return false;
            }
            &fraction[digits..]
        }
        _ => rest,
    };
    match rest {
        [] | [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Trims surrounding whitespace, returning `None` if nothing is left.
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Same as [`normalize_title`] but reports an empty title as an error.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    normalize_title(title).ok_or(ValidationError::EmptyTitle)
}

/// Validates an optional due date.
///
/// A missing or empty value means "no due date". Anything else must be a valid
/// timestamp and is kept verbatim.
pub fn normalize_due_at(due_at: Option<&str>) -> Result<Option<String>, ValidationError> {
    match due_at {
        None | Some("") => Ok(None),
        Some(value) if is_valid_timestamp(value) => Ok(Some(value.to_string())),
        Some(value) => Err(ValidationError::InvalidDueAt(value.to_string())),
    }
}
