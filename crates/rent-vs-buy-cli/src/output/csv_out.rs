use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout at full precision.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let records = match value.get("result") {
        Some(Value::Object(result)) => result_records(result),
        _ => match value {
            Value::Object(map) => field_value_records(map),
            _ => vec![vec![format_csv_value(value)]],
        },
    };

    for record in records {
        let _ = wtr.write_record(&record);
    }
    let _ = wtr.flush();
}

/// Flatten a result object into CSV records, header first.
fn result_records(result: &Map<String, Value>) -> Vec<Vec<String>> {
    if let Some(Value::Array(scenarios)) = result.get("scenarios") {
        scenario_records(scenarios)
    } else if let Some(Value::Array(rows)) = result.get("rows") {
        array_records(rows)
    } else if let Some(Value::Array(matrix)) = result.get("matrix") {
        matrix_records(result, matrix)
    } else {
        field_value_records(result)
    }
}

/// One row per (drawdown, year), tagged with the drawdown.
fn scenario_records(scenarios: &[Value]) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut headers: Option<Vec<String>> = None;

    for scenario in scenarios {
        let drawdown = scenario
            .get("drawdown_percent")
            .map(format_csv_value)
            .unwrap_or_default();
        let Some(Value::Array(years)) = scenario.get("years") else {
            continue;
        };
        for year in years {
            let Value::Object(map) = year else { continue };
            let keys = headers.get_or_insert_with(|| {
                let keys: Vec<String> = map.keys().cloned().collect();
                let mut header = vec!["drawdown_percent".to_string()];
                header.extend(keys.iter().cloned());
                records.push(header);
                keys
            });
            let mut row = vec![drawdown.clone()];
            row.extend(
                keys.iter()
                    .map(|k| map.get(k).map(format_csv_value).unwrap_or_default()),
            );
            records.push(row);
        }
    }
    records
}

/// Long format: one row per grid point.
fn matrix_records(result: &Map<String, Value>, matrix: &[Value]) -> Vec<Vec<String>> {
    let values = |key: &str| -> Vec<String> {
        match result.get(key) {
            Some(Value::Array(v)) => v.iter().map(format_csv_value).collect(),
            _ => Vec::new(),
        }
    };
    let name = |key: &str| result.get(key).map(format_csv_value).unwrap_or_default();

    let v1 = values("variable_1_values");
    let v2 = values("variable_2_values");
    let mut records = vec![vec![
        name("variable_1_name"),
        name("variable_2_name"),
        "ownership_advantage".to_string(),
    ]];
    for (a, row) in v1.iter().zip(matrix) {
        let Value::Array(cells) = row else { continue };
        for (b, cell) in v2.iter().zip(cells) {
            records.push(vec![a.clone(), b.clone(), format_csv_value(cell)]);
        }
    }
    records
}

fn array_records(arr: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Object(first)) = arr.first() else {
        return arr.iter().map(|v| vec![format_csv_value(v)]).collect();
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut records = vec![headers.clone()];
    for item in arr {
        if let Value::Object(map) = item {
            records.push(
                headers
                    .iter()
                    .map(|h| map.get(h).map(format_csv_value).unwrap_or_default())
                    .collect(),
            );
        }
    }
    records
}

fn field_value_records(map: &Map<String, Value>) -> Vec<Vec<String>> {
    let mut records = vec![vec!["field".to_string(), "value".to_string()]];
    for (key, val) in map {
        records.push(vec![key.clone(), format_csv_value(val)]);
    }
    records
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenarios_flatten_with_drawdown_column() {
        let result = json!({
            "baseline": {},
            "scenarios": [
                {"drawdown_percent": "0", "years": [
                    {"year_index": 1, "home_net_equity": "10"},
                    {"year_index": 2, "home_net_equity": "20"}
                ]},
                {"drawdown_percent": "10", "years": [
                    {"year_index": 1, "home_net_equity": "5"}
                ]}
            ]
        });
        let records = result_records(result.as_object().unwrap());
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], vec!["drawdown_percent", "home_net_equity", "year_index"]);
        assert_eq!(records[3], vec!["10", "5", "1"]);
    }

    #[test]
    fn test_matrix_long_format() {
        let result = json!({
            "variable_1_name": "a",
            "variable_2_name": "b",
            "variable_1_values": ["1", "2"],
            "variable_2_values": ["3"],
            "matrix": [["10"], ["20"]]
        });
        let records = result_records(result.as_object().unwrap());
        assert_eq!(records[0], vec!["a", "b", "ownership_advantage"]);
        assert_eq!(records[2], vec!["2", "3", "20"]);
    }
}
