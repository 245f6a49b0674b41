//! Classification of raw chat responses.
//!
//! The chat endpoint answers with free text, sometimes a JSON document, and
//! sometimes a JSON document wrapped in a ```` ```json ```` fence. The shape
//! of that JSON is not fixed, so it is inspected in priority order:
//!
//! 1. an object with a `features` array → one hours table per feature
//! 2. an object with any key containing `"hours"` → a single hours table
//! 3. a truthy `answer` field → that field as text
//! 4. anything else → the JSON itself as text
//!
//! Text that does not parse at all is shown as-is. Classification never fails.

use serde_json::{Map, Value};

use crate::models::{BotContent, FeatureSection, HoursRow};

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "\n```";
const HOURS: &str = "hours";
const HOURS_SUFFIX: &str = "_hours";

/// Remove a surrounding ```` ```json ```` fence, then trim whitespace.
pub fn strip_fence(raw: &str) -> &str {
    let body = raw.strip_prefix(FENCE_OPEN).unwrap_or(raw);
    let body = body.strip_suffix(FENCE_CLOSE).unwrap_or(body);
    body.trim()
}

/// Turn a raw response body into display content.
pub fn classify(raw: &str) -> BotContent {
    let body = strip_fence(raw);

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Response is not JSON, showing as text: {}", e);
            return BotContent::text(body);
        }
    };
    tracing::debug!("Parsed result: {}", parsed);

    classify_value(parsed)
}

/// Classify an already-parsed JSON value.
pub fn classify_value(value: Value) -> BotContent {
    if let Some(Value::Array(features)) = value.get("features") {
        let sections = features.iter().map(feature_section).collect();
        return BotContent::Features { sections };
    }

    if let Value::Object(ref map) = value {
        if map.keys().any(|key| key.contains(HOURS)) {
            return BotContent::Hours {
                rows: hours_rows(map),
            };
        }
    }

    match value.get("answer") {
        Some(answer) if is_truthy(answer) => BotContent::text(display_value(answer)),
        _ => BotContent::text(value.to_string()),
    }
}

fn feature_section(feature: &Value) -> FeatureSection {
    match feature {
        Value::Object(map) => FeatureSection {
            name: map.get("name").cloned(),
            rows: hours_rows(map),
        },
        _ => FeatureSection {
            name: None,
            rows: Vec::new(),
        },
    }
}

/// Every `*hours*` key of an object, in document order.
fn hours_rows(map: &Map<String, Value>) -> Vec<HoursRow> {
    map.iter()
        .filter(|(key, _)| key.contains(HOURS))
        .map(|(key, value)| HoursRow::new(platform_label(key), value.clone()))
        .collect()
}

/// `android_hours` → `Android`, `hours` → `Hours`.
///
/// Only the first `_hours` is removed.
pub fn platform_label(key: &str) -> String {
    let base = key.replacen(HOURS_SUFFIX, "", 1);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Falsy values are `null`, `false`, zero and the empty string.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings are shown without quotes, null as nothing, the rest as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_answer() {
        let content = classify("```json\n{\"answer\":\"hi\"}\n```");
        assert_eq!(content, BotContent::text("hi"));
    }

    #[test]
    fn test_plain_text_falls_back() {
        let content = classify("  Sorry, I don't know.  ");
        assert_eq!(content, BotContent::text("Sorry, I don't know."));
    }

    #[test]
    fn test_broken_fenced_json_falls_back_to_stripped_text() {
        let content = classify("```json\n{\"answer\": \n```");
        assert_eq!(content, BotContent::text("{\"answer\":"));
    }

    #[test]
    fn test_top_level_hours() {
        let content = classify(r#"{"cpu_hours": 3, "gpu_hours": 5}"#);
        assert_eq!(
            content,
            BotContent::Hours {
                rows: vec![HoursRow::new("Cpu", 3), HoursRow::new("Gpu", 5)],
            }
        );
    }

    #[test]
    fn test_hours_keep_document_order_and_skip_other_keys() {
        let content = classify(r#"{"website_hours": "4", "note": "x", "api_hours": 1.5}"#);
        assert_eq!(
            content,
            BotContent::Hours {
                rows: vec![HoursRow::new("Website", "4"), HoursRow::new("Api", 1.5)],
            }
        );
    }

    #[test]
    fn test_features() {
        let content = classify(r#"{"features":[{"name":"Login","android_hours":2}]}"#);
        assert_eq!(
            content,
            BotContent::Features {
                sections: vec![FeatureSection {
                    name: Some(json!("Login")),
                    rows: vec![HoursRow::new("Android", 2)],
                }],
            }
        );
    }

    #[test]
    fn test_features_take_priority_over_hours() {
        let content = classify(r#"{"total_hours": 9, "features": []}"#);
        assert_eq!(content, BotContent::Features { sections: vec![] });
    }

    #[test]
    fn test_features_not_array_is_ignored() {
        let content = classify(r#"{"features": "none", "answer": "ok"}"#);
        assert_eq!(content, BotContent::text("ok"));
    }

    #[test]
    fn test_non_object_feature_is_empty_section() {
        let content = classify(r#"{"features": [3]}"#);
        assert_eq!(
            content,
            BotContent::Features {
                sections: vec![FeatureSection {
                    name: None,
                    rows: vec![],
                }],
            }
        );
    }

    #[test]
    fn test_falsy_answer_shows_json() {
        let content = classify(r#"{"answer": ""}"#);
        assert_eq!(content, BotContent::text(r#"{"answer":""}"#));
    }

    #[test]
    fn test_numeric_answer() {
        assert_eq!(classify(r#"{"answer": 42}"#), BotContent::text("42"));
    }

    #[test]
    fn test_other_shapes_show_literal_json() {
        assert_eq!(classify("null"), BotContent::text("null"));
        assert_eq!(classify("[1, 2]"), BotContent::text("[1,2]"));
        assert_eq!(classify(r#""quoted""#), BotContent::text(r#""quoted""#));
        assert_eq!(
            classify(r#"{"message": "hello"}"#),
            BotContent::text(r#"{"message":"hello"}"#)
        );
    }

    #[test]
    fn test_platform_label() {
        assert_eq!(platform_label("android_hours"), "Android");
        assert_eq!(platform_label("ios_hours"), "Ios");
        assert_eq!(platform_label("hours"), "Hours");
        assert_eq!(platform_label("total_hours_max"), "Total_max");
        assert_eq!(platform_label("_hours"), "");
    }
}
