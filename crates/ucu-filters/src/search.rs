//! Free-text search box classification.
//!
//! One search box feeds three filter keys. The shape of the term decides
//! which:
//!
//! - `A12345` / `B12345` - access number
//! - `21B12/345` style - registration number (may be embedded in longer text)
//! - anything else - student name

use std::sync::LazyLock;

use regex::Regex;
use ucu_model::{FilterKey, FilterValue};

static ACCESS_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[AB]\d{5}$").expect("Invalid access number regex"));

static REG_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}[BMD]\d{2}/\d{3}").expect("Invalid reg number regex"));

/// Map a search term to the filter it should set.
///
/// Returns `None` for blank input. The term is trimmed but otherwise stored
/// as typed.
pub fn classify_search(term: &str) -> Option<(FilterKey, FilterValue)> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let key = if ACCESS_NUMBER_REGEX.is_match(term) {
        FilterKey::AccessNumber
    } else if REG_NUMBER_REGEX.is_match(term) {
        FilterKey::RegNumber
    } else {
        FilterKey::StudentName
    };
    Some((key, FilterValue::Text(term.to_string())))
}
