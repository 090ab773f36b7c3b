use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_scalar;

/// Columns shown for each projected year of a scenario.
const YEAR_COLUMNS: [&str; 7] = [
    "year_index",
    "home_market_value",
    "remaining_balance",
    "home_net_equity",
    "investment_net_equity",
    "cumulative_interest_paid",
    "cumulative_holding_costs",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_footer(map);
            } else {
                print_flat_object(map);
            }
        }
        _ => println!("{}", display_scalar(value)),
    }
}

fn print_result(result: &Value) {
    let Value::Object(res_map) = result else {
        println!("{}", display_scalar(result));
        return;
    };

    if let Some(Value::Array(scenarios)) = res_map.get("scenarios") {
        print_simulation(res_map, scenarios);
    } else if let Some(Value::Array(rows)) = res_map.get("rows") {
        print_flat_object(&without(res_map, "rows"));
        println!();
        print_array_table(rows, None);
    } else if let Some(Value::Array(matrix)) = res_map.get("matrix") {
        print_sensitivity(res_map, matrix);
    } else {
        print_flat_object(res_map);
    }
}

fn print_simulation(res_map: &Map<String, Value>, scenarios: &[Value]) {
    if let Some(Value::Object(baseline)) = res_map.get("baseline") {
        println!("Baseline (year-1 costs; annual_rent includes one rent increase, base_annual_rent does not)");
        print_flat_object(baseline);
    }

    for scenario in scenarios {
        let Value::Object(s) = scenario else { continue };
        println!(
            "\nDrawdown {}% (starting home value {})",
            s.get("drawdown_percent").map(display_scalar).unwrap_or_default(),
            s.get("starting_home_value").map(display_scalar).unwrap_or_default(),
        );
        match s.get("years") {
            Some(Value::Array(years)) if !years.is_empty() => {
                print_array_table(years, Some(&YEAR_COLUMNS))
            }
            _ => println!("(no projected years)"),
        }
        if let Some(Value::Object(summary)) = s.get("summary") {
            print_flat_object(summary);
        }
    }
}

fn print_sensitivity(res_map: &Map<String, Value>, matrix: &[Value]) {
    let name_1 = res_map.get("variable_1_name").map(display_scalar).unwrap_or_default();
    let name_2 = res_map.get("variable_2_name").map(display_scalar).unwrap_or_default();
    let cols: Vec<String> = match res_map.get("variable_2_values") {
        Some(Value::Array(v)) => v.iter().map(display_scalar).collect(),
        _ => Vec::new(),
    };
    let rows: Vec<String> = match res_map.get("variable_1_values") {
        Some(Value::Array(v)) => v.iter().map(display_scalar).collect(),
        _ => Vec::new(),
    };

    println!(
        "Ownership advantage at drawdown {}% ({} down, {} across)",
        res_map.get("drawdown_percent").map(display_scalar).unwrap_or_default(),
        name_1,
        name_2
    );

    let mut builder = Builder::default();
    let mut header = vec![format!("{name_1} \\ {name_2}")];
    header.extend(cols);
    builder.push_record(header);
    for (label, row) in rows.iter().zip(matrix) {
        let mut record = vec![label.clone()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(display_scalar));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));

    if let Some(base) = res_map.get("base_case_value") {
        println!("Base case: {}", display_scalar(base));
    }
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), display_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value], columns: Option<&[&str]>) {
    let Some(Value::Object(first)) = arr.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = match columns {
        Some(cols) => cols.iter().map(|c| c.to_string()).collect(),
        None => first.keys().cloned().collect(),
    };
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}

fn without(map: &Map<String, Value>, key: &str) -> Map<String, Value> {
    let mut copy = map.clone();
    copy.remove(key);
    copy
}
