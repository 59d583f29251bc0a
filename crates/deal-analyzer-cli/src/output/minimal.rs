use serde_json::Value;

/// Headline answer fields, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "recommendation",
    "overall_grade",
    "irr",
    "noi",
    "going_in_cap_rate",
    "cash_on_cash_return",
    "dscr",
    "sale_prices",
];

/// Objects nested in a result that may carry the headline instead.
const NESTED_KEYS: [&str; 3] = ["advisory", "adjusted_metrics", "financial_metrics"];

/// Print just the key answer value from the output.
///
/// Looks for a priority field in the result, then in its well-known nested
/// sections, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = find_headline(result_obj) {
        println!("{}", format_minimal(val));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_headline(result: &Value) -> Option<&Value> {
    let map = result.as_object()?;
    let sections = std::iter::once(map).chain(
        NESTED_KEYS
            .iter()
            .filter_map(|k| map.get(*k).and_then(Value::as_object)),
    );
    for section in sections {
        for key in PRIORITY_KEYS {
            match section.get(key) {
                Some(val) if !val.is_null() => return Some(val),
                _ => {}
            }
        }
    }
    None
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
