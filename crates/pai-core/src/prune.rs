use serde_json::{Map, Value};

/// True for the values dropped on output: null, `""`, `[]` and `{}`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(object) => object.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Removes empty fields from every mapping, bottom-up, so a mapping that only
/// held empty fields disappears as well. Sequence elements are pruned inside but
/// never removed; a sequence that ends up with no elements is dropped by its parent.
pub fn prune_empty(value: &Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(prune_empty_map(object)),
        Value::Array(items) => Value::Array(items.iter().map(prune_empty).collect()),
        _ => value.clone(),
    }
}

pub fn prune_empty_map(object: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in object {
        let pruned = prune_empty(value);
        if is_empty_value(&pruned) {
            continue;
        }
        out.insert(key.clone(), pruned);
    }
    out
}

#[cfg(test)]
#[path = "prune_test.rs"]
mod tests;
