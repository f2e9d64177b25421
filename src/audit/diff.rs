//! Diff summaries for audit entries

use serde_json::Value;

/// Fields that change on every write and carry no information
const IGNORED_FIELDS: &[&str] = &["updatedAt"];

const MAX_STRING: usize = 50;

/// Summarize the top-level field changes between two JSON values
///
/// Returns `None` when nothing relevant changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if IGNORED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING => {
            let head: String = s.chars().take(MAX_STRING - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_change() {
        let before = json!({"legalName": "Acme SA", "isActive": true});
        let after = json!({"legalName": "Acme SAS", "isActive": true});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "legalName: \"Acme SA\" -> \"Acme SAS\"");
    }

    #[test]
    fn test_updated_at_ignored() {
        let before = json!({"name": "x", "updatedAt": "2025-01-01T00:00:00Z"});
        let after = json!({"name": "x", "updatedAt": "2025-02-01T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"closedBy": "ana"});
        let after = json!({"closedAt": null});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("closedBy: \"ana\" -> (removed)"));
        assert!(diff.contains("closedAt: (added) -> null"));
    }

    #[test]
    fn test_long_string_truncation_is_char_safe() {
        let long = "ñ".repeat(80);
        let diff = generate_diff(&json!({"d": long}), &json!({"d": "short"})).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
