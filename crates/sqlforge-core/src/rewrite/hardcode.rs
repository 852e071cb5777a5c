//! Hardcode markers: string literals that must stay literals.
//!
//! A literal such as `'HARDCODE_AS_STRING{Vipin}'` is not turned into a
//! parameter. Its payload is inlined instead: `'Vipin'`.

use std::sync::LazyLock;

use regex::Regex;

/// Prefix that marks a literal as hardcoded.
pub const MARKER_PREFIX: &str = "HARDCODE_AS_";

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"HARDCODE_AS_(STRING|NUMBER|RAW)\{(.*)\}").expect("marker pattern is valid")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("number pattern is valid")
});

/// A marker with a well-formed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardcodeMarker {
    /// Inlined as a quoted string literal.
    String(String),
    /// Inlined bare; must be a decimal number.
    Number(String),
    /// Inlined bare, verbatim.
    Raw(String),
}

/// A literal carries the marker prefix but no valid payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed hardcode marker in literal '{0}'")]
pub struct MalformedMarker(pub String);

impl HardcodeMarker {
    /// Detects a marker in the text of a string literal.
    ///
    /// Returns `Ok(None)` when the text does not mention the marker prefix.
    ///
    /// # Errors
    ///
    /// Returns `MalformedMarker` when the prefix is present but the payload
    /// is missing, unbraced, or not a number for `NUMBER`.
    pub fn detect(text: &str) -> Result<Option<Self>, MalformedMarker> {
        if !text.contains(MARKER_PREFIX) {
            return Ok(None);
        }
        let malformed = || MalformedMarker(text.to_string());
        let caps = MARKER.captures(text).ok_or_else(malformed)?;
        let payload = caps[2].to_string();
        let marker = match &caps[1] {
            "STRING" => Self::String(payload),
            "NUMBER" if NUMBER.is_match(payload.trim()) => Self::Number(payload.trim().to_string()),
            "RAW" if !payload.trim().is_empty() => Self::Raw(payload),
            _ => return Err(malformed()),
        };
        Ok(Some(marker))
    }

    /// Returns the SQL text that replaces the literal.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::String(value) => format!("'{}'", value.replace('\'', "''")),
            Self::Number(value) | Self::Raw(value) => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_marker() {
        assert_eq!(HardcodeMarker::detect("Vipin"), Ok(None));
    }

    #[test]
    fn test_string_marker() {
        let marker = HardcodeMarker::detect("HARDCODE_AS_STRING{Vipin}")
            .unwrap()
            .unwrap();
        assert_eq!(marker, HardcodeMarker::String(String::from("Vipin")));
        assert_eq!(marker.to_sql(), "'Vipin'");
    }

    #[test]
    fn test_string_marker_escapes_quotes() {
        let marker = HardcodeMarker::detect("HARDCODE_AS_STRING{O'Brien}")
            .unwrap()
            .unwrap();
        assert_eq!(marker.to_sql(), "'O''Brien'");
    }

    #[test]
    fn test_number_and_raw_markers() {
        let number = HardcodeMarker::detect("HARDCODE_AS_NUMBER{42.5}")
            .unwrap()
            .unwrap();
        assert_eq!(number.to_sql(), "42.5");

        let raw = HardcodeMarker::detect("HARDCODE_AS_RAW{CURRENT_DATE}")
            .unwrap()
            .unwrap();
        assert_eq!(raw.to_sql(), "CURRENT_DATE");
    }

    #[test]
    fn test_malformed_markers() {
        assert!(HardcodeMarker::detect("HARDCODE_AS_STRING").is_err());
        assert!(HardcodeMarker::detect("HARDCODE_AS_DATE{2024}").is_err());
        assert!(HardcodeMarker::detect("HARDCODE_AS_NUMBER{abc}").is_err());
        assert!(HardcodeMarker::detect("HARDCODE_AS_RAW{}").is_err());
    }
}
