//! Alert Types
//!
//! Core types for the evaluation pipeline.
//! NO stage logic here - only data structures and text canonicalization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::MISSING;
use crate::logic::error::TriageError;

// ============================================================================
// GROUND TRUTH LABEL
// ============================================================================

/// Ground truth classification of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
    /// True positive - a real incident
    Tp,
    /// False positive - benign activity that fired a rule
    Fp,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Tp => "TP",
            Label::Fp => "FP",
        }
    }
}

impl std::str::FromStr for Label {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_label_text(s).as_str() {
            "TP" => Ok(Label::Tp),
            "FP" => Ok(Label::Fp),
            _ => Err(TriageError::InvalidLabel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Label {
    type Error = TriageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Priority category derived from the rule level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
    /// Rule level was absent (negative)
    Missing,
}

impl Priority {
    /// The vocabulary an oracle is allowed to answer with
    pub const VOCABULARY: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
            Priority::Missing => MISSING,
        }
    }

    /// Parse canonical or loosely-cased text, `None` if outside the enumeration
    pub fn parse(s: &str) -> Option<Priority> {
        match capitalize(s.trim()).as_str() {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            "Critical" => Some(Priority::Critical),
            "Missing" => Some(Priority::Missing),
            _ => None,
        }
    }

    pub fn is_high_or_critical(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Priority::parse(&value).ok_or_else(|| format!("unknown priority '{}'", value))
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ORACLE RESPONSE
// ============================================================================

/// Structured answer of the classification oracle
///
/// Fields the oracle omitted read as `MISSING`; non-string values are kept as
/// their JSON text. Unknown keys (an echoed alert id, a confidence) are kept
/// in `extra` so a stored response re-serializes unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleResponse {
    #[serde(default = "missing_text", deserialize_with = "lenient_text")]
    pub classification: String,
    #[serde(default = "missing_text", deserialize_with = "lenient_text")]
    pub priority: String,
    #[serde(default = "missing_text", deserialize_with = "lenient_text")]
    pub justification: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl OracleResponse {
    pub fn new(
        classification: impl Into<String>,
        priority: impl Into<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            classification: classification.into(),
            priority: priority.into(),
            justification: justification.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Sentinel substituted when the oracle call failed
    pub fn error_sentinel() -> Self {
        use crate::constants::ORACLE_ERROR;
        Self::new(ORACLE_ERROR, ORACLE_ERROR, ORACLE_ERROR)
    }

    pub fn is_error_sentinel(&self) -> bool {
        *self == Self::error_sentinel()
    }
}

fn missing_text() -> String {
    MISSING.to_string()
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => missing_text(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

// ============================================================================
// ALERT RECORD
// ============================================================================

/// The unit of work flowing through every stage
///
/// Wire names follow the line-delimited record schema shared with existing
/// result files (`chatgpt_*` fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub description: String,
    pub label: Label,
    /// -1 when the rule carried no level
    pub rule_level: i64,
    pub rule_priority: Priority,
    /// Raw alert with presentation-only fields stripped
    pub alert: Value,

    #[serde(rename = "chatgpt_response", default, skip_serializing_if = "Option::is_none")]
    pub oracle_response: Option<OracleResponse>,
    #[serde(rename = "chatgpt_classification", default, skip_serializing_if = "Option::is_none")]
    pub oracle_classification: Option<String>,
    #[serde(rename = "chatgpt_priority", default, skip_serializing_if = "Option::is_none")]
    pub oracle_priority: Option<String>,
    #[serde(rename = "chatgpt_justification", default, skip_serializing_if = "Option::is_none")]
    pub oracle_justification: Option<String>,
    #[serde(rename = "classification_match", default, skip_serializing_if = "Option::is_none")]
    pub classification_agrees: Option<bool>,
    #[serde(rename = "priority_match", default, skip_serializing_if = "Option::is_none")]
    pub priority_agrees: Option<bool>,
}

impl AlertRecord {
    /// Fresh, unclassified record
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        label: Label,
        rule_level: i64,
        alert: Value,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            label,
            rule_level,
            rule_priority: super::severity::map_rule_level(rule_level),
            alert,
            oracle_response: None,
            oracle_classification: None,
            oracle_priority: None,
            oracle_justification: None,
            classification_agrees: None,
            priority_agrees: None,
        }
    }

    /// Idempotency marker: a stored response means no further oracle call
    pub fn is_classified(&self) -> bool {
        self.oracle_response.is_some()
    }

    pub fn oracle_classification_text(&self) -> &str {
        self.oracle_classification.as_deref().unwrap_or(MISSING)
    }

    pub fn oracle_priority_text(&self) -> &str {
        self.oracle_priority.as_deref().unwrap_or(MISSING)
    }

    /// Strict agreement of the current classification field
    pub fn classification_matches(&self) -> bool {
        self.oracle_classification_text() == self.label.as_str()
    }

    /// Strict agreement of the current priority field
    pub fn priority_matches(&self) -> bool {
        self.oracle_priority_text() == self.rule_priority.as_str()
    }
}

// ============================================================================
// TEXT CANONICALIZATION
// ============================================================================

/// First character upper-cased, the rest lower-cased
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Trimmed and upper-cased, the form classifications are compared in
pub fn canonical_label_text(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Trimmed and capitalized, the form priorities are compared in
pub fn canonical_priority_text(s: &str) -> String {
    capitalize(s.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capitalize_matches_sentence_case() {
        assert_eq!(capitalize("hIGH"), "High");
        assert_eq!(capitalize("critical"), "Critical");
        assert_eq!(capitalize(""), "");
        assert_eq!(canonical_priority_text("  medium \n"), "Medium");
    }

    #[test]
    fn test_label_parse_is_case_insensitive() {
        assert_eq!(" tp ".parse::<Label>().unwrap(), Label::Tp);
        assert_eq!("Fp".parse::<Label>().unwrap(), Label::Fp);
        assert!("maybe".parse::<Label>().is_err());
    }

    #[test]
    fn test_priority_wire_names() {
        assert_eq!(serde_json::to_value(Priority::Missing).unwrap(), json!("MISSING"));
        assert_eq!(serde_json::from_value::<Priority>(json!("high")).unwrap(), Priority::High);
        assert!(serde_json::from_value::<Priority>(json!("Urgent")).is_err());
    }

    #[test]
    fn test_oracle_response_is_lenient() {
        let resp: OracleResponse = serde_json::from_value(json!({
            "id": "a-1",
            "classification": "TP",
            "priority": 3,
            "justification": null
        }))
        .unwrap();

        assert_eq!(resp.classification, "TP");
        assert_eq!(resp.priority, "3");
        assert_eq!(resp.justification, MISSING);
        assert_eq!(resp.extra.get("id"), Some(&json!("a-1")));
    }

    #[test]
    fn test_unclassified_record_omits_oracle_fields() {
        let record = AlertRecord::new("a-1", "ssh brute force", Label::Tp, 10, json!({}));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["rule_priority"], json!("Medium"));
        assert_eq!(value["label"], json!("TP"));
        assert!(value.get("chatgpt_response").is_none());
        assert!(!record.is_classified());
    }
}
