use serde_json::Value;

use super::display_scalar;

/// Print just the key answer value from the output.
///
/// Simulations print one `drawdown: ownership advantage` line per scenario;
/// other results print the first well-known field present.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["base_case_value", "annual_payment", "total_interest"];

    let Value::Object(map) = result_obj else {
        return vec![display_scalar(result_obj)];
    };

    if let Some(Value::Array(scenarios)) = map.get("scenarios") {
        return scenarios
            .iter()
            .map(|s| {
                let advantage = s
                    .get("summary")
                    .and_then(|summary| summary.get("ownership_advantage"))
                    .map(display_scalar)
                    .unwrap_or_else(|| "-".to_string());
                let drawdown = s.get("drawdown_percent").map(display_scalar).unwrap_or_default();
                format!("{drawdown}%: {advantage}")
            })
            .collect();
    }

    for key in &priority_keys {
        if let Some(val) = map.get(*key) {
            if !val.is_null() {
                return vec![display_scalar(val)];
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => vec![format!("{}: {}", key, display_scalar(val))],
        None => Vec::new(),
    }
}
