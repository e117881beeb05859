//! Scalar filter values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single filter value: a string or an integer.
///
/// Untagged on the wire, so select boxes that post `"7"` and APIs that post
/// `7` both deserialize. The two forms are distinct values; [`FilterMap`]
/// folds them together for identifier keys via [`FilterValue::into_identifier`].
///
/// [`FilterMap`]: crate::FilterMap
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl FilterValue {
    /// True for text that is empty after trimming.
    ///
    /// Empty values mean "no constraint" and are never stored.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Integer(_) => false,
            FilterValue::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) => Some(text),
            FilterValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(value) => Some(*value),
            FilterValue::Text(_) => None,
        }
    }

    /// Parse free-form input (CLI, query strings): integers become
    /// [`FilterValue::Integer`], everything else is kept as text.
    pub fn parse_loose(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i64>() {
            Ok(number) => FilterValue::Integer(number),
            Err(_) => FilterValue::Text(trimmed.to_string()),
        })
    }
}

impl FilterValue {
    /// Canonical integer text becomes [`FilterValue::Integer`]; anything else,
    /// including `"007"`, is returned unchanged.
    #[must_use]
    pub fn into_identifier(self) -> Self {
        match self {
            FilterValue::Text(text) => match text.trim().parse::<i64>() {
                Ok(number) if number.to_string() == text.trim() => FilterValue::Integer(number),
                _ => FilterValue::Text(text),
            },
            integer => integer,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(value) => write!(f, "{value}"),
            FilterValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_accepts_both_forms() {
        let number: FilterValue = serde_json::from_str("7").unwrap();
        let text: FilterValue = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(number, FilterValue::Integer(7));
        assert_eq!(text, FilterValue::Text("7".into()));
        assert_ne!(number, text);
    }

    #[test]
    fn test_into_identifier_only_folds_canonical_integers() {
        assert_eq!(FilterValue::from("7").into_identifier(), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(" 12 ").into_identifier(), FilterValue::Integer(12));
        assert_eq!(FilterValue::from("007").into_identifier(), FilterValue::from("007"));
        assert_eq!(FilterValue::from("B12").into_identifier(), FilterValue::from("B12"));
        assert_eq!(FilterValue::from(3).into_identifier(), FilterValue::Integer(3));
    }

    #[test]
    fn test_whitespace_text_is_empty() {
        assert!(FilterValue::from("  ").is_empty());
        assert!(!FilterValue::from("F").is_empty());
        assert!(!FilterValue::from(0).is_empty());
    }

    #[test]
    fn test_parse_loose_prefers_integers() {
        assert_eq!(FilterValue::parse_loose(" 12 "), Some(FilterValue::Integer(12)));
        assert_eq!(
            FilterValue::parse_loose("B12345"),
            Some(FilterValue::Text("B12345".into()))
        );
        assert_eq!(FilterValue::parse_loose(""), None);
    }
}
