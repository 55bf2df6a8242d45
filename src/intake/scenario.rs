//! Per-item operation decoding.
//!
//! Items are decoded one at a time so a single malformed entry degrades to
//! [`Operation::Unrecognized`] instead of discarding the whole response.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::Operation;

/// Scenario field aliases and the canonical names the engine reads.
const FIELD_ALIASES: [(&str, &str); 3] = [
    ("lineId", "newLineId"),
    ("startDate", "newStartDate"),
    ("quantity", "newQuantity"),
];

/// Maps simulator field names onto canonical operation field names.
///
/// `lineId`, `startDate` and `quantity` fill `newLineId`, `newStartDate`
/// and `newQuantity` when the canonical field is absent or null. Canonical
/// fields already present are kept. Non-object values pass through.
pub fn normalize_scenario_operation(value: Value) -> Value {
    let Value::Object(mut fields) = value else {
        return value;
    };
    for (alias, canonical) in FIELD_ALIASES {
        if has_value(&fields, canonical) {
            continue;
        }
        if let Some(aliased) = fields.get(alias).filter(|v| !v.is_null()).cloned() {
            fields.insert(canonical.to_string(), aliased);
        }
    }
    Value::Object(fields)
}

fn has_value(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(|v| !v.is_null())
}

/// Decodes one operation, falling back to [`Operation::Unrecognized`].
pub fn decode_operation(value: Value) -> Operation {
    match serde_json::from_value::<Operation>(value.clone()) {
        Ok(op) => op,
        Err(err) => {
            let action_type = raw_action_type(&value).unwrap_or("unknown");
            warn!(action_type, error = %err, "operation could not be decoded, treated as no-op");
            Operation::Unrecognized
        }
    }
}

/// The `actionType` string as sent, if any.
pub fn raw_action_type(value: &Value) -> Option<&str> {
    value.get("actionType").and_then(Value::as_str)
}

/// The `stripId` as display text, if any.
pub fn raw_strip_ref(value: &Value) -> Option<String> {
    match value.get("stripId")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
