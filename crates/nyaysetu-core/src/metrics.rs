//! Derived lawyer metrics and loosely-typed case outcome flags

use serde_json::Value;

/// Percentage of cases won, rounded to two decimal places.
///
/// Returns 0.0 when no cases have been recorded.
pub fn win_rate(won_cases: i64, total_cases: i64) -> f64 {
    if total_cases <= 0 {
        return 0.0;
    }
    let pct = won_cases as f64 / total_cases as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Interpret the `won` field of an increment-cases request.
///
/// Truthy values are `true`, `1`, and the strings "true", "1" and "yes" in
/// any letter case. Anything else, including a missing field, is a loss.
pub fn parse_won_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1) || n.as_u64() == Some(1),
        Some(Value::String(s)) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}
