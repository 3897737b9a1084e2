//! Severity Mapping
//!
//! Rule level -> ground truth priority. Pure, no state.

use serde_json::Value;

use super::types::Priority;
use crate::logic::error::{TriageError, TriageResult};

/// Rule level recorded when the rule carries none
pub const ABSENT_RULE_LEVEL: i64 = -1;

/// Lowest level of each band, checked top-down
pub const CRITICAL_MIN_LEVEL: i64 = 15;
pub const HIGH_MIN_LEVEL: i64 = 12;
pub const MEDIUM_MIN_LEVEL: i64 = 7;
pub const LOW_MIN_LEVEL: i64 = 0;

/// Map a rule level to its priority category. First match wins.
pub fn map_rule_level(level: i64) -> Priority {
    if level >= CRITICAL_MIN_LEVEL {
        Priority::Critical
    } else if level >= HIGH_MIN_LEVEL {
        Priority::High
    } else if level >= MEDIUM_MIN_LEVEL {
        Priority::Medium
    } else if level >= LOW_MIN_LEVEL {
        Priority::Low
    } else {
        Priority::Missing
    }
}

/// Read a rule level out of raw alert JSON.
///
/// Missing key or `null` is absent (-1). Integers, floats (truncated) and
/// integer strings are accepted; anything else is `InvalidSeverity`.
pub fn parse_rule_level(value: Option<&Value>) -> TriageResult<i64> {
    let invalid = |v: &Value| TriageError::InvalidSeverity { value: v.to_string() };

    let Some(v) = value else {
        return Ok(ABSENT_RULE_LEVEL);
    };

    match v {
        Value::Null => Ok(ABSENT_RULE_LEVEL),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(u) = n.as_u64() {
                Ok(i64::try_from(u).unwrap_or(i64::MAX))
            } else {
                n.as_f64().map(|f| f.trunc() as i64).ok_or_else(|| invalid(v))
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid(v)),
        _ => Err(invalid(v)),
    }
}

/// Parse and map in one step
pub fn severity_of(value: Option<&Value>) -> TriageResult<(i64, Priority)> {
    let level = parse_rule_level(value)?;
    Ok((level, map_rule_level(level)))
}
