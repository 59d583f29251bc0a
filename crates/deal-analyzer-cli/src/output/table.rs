use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Metric columns shown for each row of a sweep.
const SWEEP_COLUMNS: [&str; 7] = [
    "noi",
    "going_in_cap_rate",
    "cash_on_cash_return",
    "dscr",
    "irr",
    "equity_multiple",
    "exit_value",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object_tables(map);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        print_object_tables(res_map);
    } else {
        println!("{}", format_value(result));
    }

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

/// Scalars go in a Field/Value table; nested objects get their own titled
/// table and sweep points a row-per-value table.
fn print_object_tables(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&str, &Map<String, Value>)> = Vec::new();
    let mut points: Option<&Vec<Value>> = None;
    let mut scalars = 0;

    for (key, val) in map {
        match val {
            Value::Object(inner) => sections.push((key.as_str(), inner)),
            Value::Array(arr) if key == "points" => points = Some(arr),
            _ => {
                builder.push_record([key.as_str(), &format_value(val)]);
                scalars += 1;
            }
        }
    }

    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for (title, inner) in sections {
        println!("\n{}", title);
        let mut section = Builder::default();
        section.push_record(["Field", "Value"]);
        for (key, val) in inner {
            section.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(section));
    }

    if let Some(arr) = points {
        println!();
        print_points_table(arr);
    }
}

fn print_points_table(points: &[Value]) {
    if points.is_empty() {
        println!("(empty)");
        return;
    }

    let mut builder = Builder::default();
    let mut header = vec!["value".to_string()];
    header.extend(SWEEP_COLUMNS.iter().map(|c| c.to_string()));
    builder.push_record(header);

    for point in points {
        let mut row = vec![point.get("value").map(format_value).unwrap_or_default()];
        for col in SWEEP_COLUMNS {
            row.push(
                point
                    .get("metrics")
                    .and_then(|m| m.get(col))
                    .map(format_value)
                    .unwrap_or_default(),
            );
        }
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}

pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
