//! Text Normalization
//!
//! Pure, stateless transforms and predicates over oracle text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_JUSTIFICATION_CHARS, TRUNCATION_MARKER};
use crate::logic::alert::{canonical_priority_text, Label, Priority};

static TP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(TP|TRUE\s*POSITIVE)\b").expect("TP pattern is valid"));

static FP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(FP|FALSE\s*POSITIVE)\b").expect("FP pattern is valid"));

/// Unicode general category C: control, format, surrogate, private use, unassigned
static OTHER_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{C}").expect("category pattern is valid"));

/// Map verbose classifications onto `TP`/`FP`.
///
/// The TP pattern is tried first. Text matching neither is returned as is.
pub fn normalize_classification(input: &str) -> String {
    if TP_PATTERN.is_match(input) {
        Label::Tp.as_str().to_string()
    } else if FP_PATTERN.is_match(input) {
        Label::Fp.as_str().to_string()
    } else {
        input.to_string()
    }
}

/// Is the priority (after trim + capitalize) one of Low/Medium/High/Critical
pub fn is_allowed_priority(input: &str) -> bool {
    let clean = canonical_priority_text(input);
    Priority::VOCABULARY.iter().any(|p| p.as_str() == clean)
}

/// Strip category-C characters and cap the length for report rendering
pub fn sanitize_justification(input: &str) -> String {
    let clean = OTHER_CHARS.replace_all(input, "");

    match clean.char_indices().nth(MAX_JUSTIFICATION_CHARS) {
        Some((cut, _)) => format!("{}{}", &clean[..cut], TRUNCATION_MARKER),
        None => clean.into_owned(),
    }
}
