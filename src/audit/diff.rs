//! Human-readable diffs between entity snapshots

use serde_json::Value;

const MAX_STRING_CHARS: usize = 50;

/// Summarise top-level field changes between two JSON snapshots
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes: Vec<String> = before_obj
                .iter()
                .filter_map(|(key, old)| match after_obj.get(key) {
                    Some(new) if new != old => {
                        Some(format!("{}: {} -> {}", key, format_value(old), format_value(new)))
                    }
                    Some(_) => None,
                    None => Some(format!("{}: {} -> (removed)", key, format_value(old))),
                })
                .collect();

            changes.extend(
                after_obj
                    .iter()
                    .filter(|(key, _)| !before_obj.contains_key(*key))
                    .map(|(key, new)| format!("{}: (added) -> {}", key, format_value(new))),
            );
            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    // Timestamps change on every write and would drown the real change
    let changes: Vec<String> = changes
        .into_iter()
        .filter(|c| !c.starts_with("updatedAt:") && !c.starts_with("updated_at:"))
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
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
    fn test_changed_fields_only() {
        let before = json!({"name": "Checking", "balance": 50000});
        let after = json!({"name": "Checking", "balance": 40000});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "balance: 50000 -> 40000");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"name": "Visa", "creditLimit": 100000});
        let after = json!({"name": "Visa", "targetAccountId": "x"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("creditLimit: 100000 -> (removed)"));
        assert!(diff.contains("targetAccountId: (added) -> \"x\""));
    }

    #[test]
    fn test_timestamp_only_change_is_no_change() {
        let before = json!({"name": "A", "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"name": "A", "updated_at": "2025-01-02T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_long_multibyte_string_is_truncated_safely() {
        let before = json!({"description": "ق".repeat(80)});
        let after = json!({"description": "short"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");
    }
}
