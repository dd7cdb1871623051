use serde_json::{Map, Value, json};

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Decode an activity description that the API ships as a JSON-encoded string.
///
/// Falsy input yields `{}`. A string is parsed strictly; when that fails the
/// original text is kept as `{"raw": <text>}`. Anything else is assumed to be
/// decoded already and comes back unchanged.
pub fn decode_description(value: Value) -> Value {
    if is_falsy(&value) {
        return Value::Object(Map::new());
    }
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(decoded) => decoded,
            Err(_) => json!({ "raw": text }),
        },
        other => other,
    }
}
