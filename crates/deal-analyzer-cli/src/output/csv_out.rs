use serde_json::Value;
use std::io;

use crate::output::table::format_value;

/// Write output as CSV to stdout.
///
/// Sweeps become one row per swept value with every metric as a column;
/// anything else is a two-column field/value listing of the result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(points)) = map.get("points") {
                write_points_csv(&mut wtr, points);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&format_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_points_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, points: &[Value]) {
    let Some(Value::Object(first)) = points.first().and_then(|p| p.get("metrics")) else {
        return;
    };

    let columns: Vec<&str> = first
        .iter()
        .filter(|(_, v)| !v.is_array())
        .map(|(k, _)| k.as_str())
        .collect();
    let mut header = vec!["value"];
    header.extend(&columns);
    let _ = wtr.write_record(&header);

    for point in points {
        let mut row = vec![point.get("value").map(format_value).unwrap_or_default()];
        for col in &columns {
            row.push(
                point
                    .get("metrics")
                    .and_then(|m| m.get(*col))
                    .map(format_value)
                    .unwrap_or_default(),
            );
        }
        let _ = wtr.write_record(&row);
    }
}
