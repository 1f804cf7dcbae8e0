//! Response normalization.
//!
//! Generated queries alias every scalar field as `<TypeName>__<field>`.
//! [`strip_alias_prefixes`] restores the plain field names on each node whose
//! `__typename` matches the prefix. Both functions return a new tree and are
//! idempotent.

use crate::preview::PreviewContext;
use serde_json::{Map, Value};

const TYPENAME: &str = "__typename";
const CONTEXT: &str = "__context";

/// Removes `<__typename>__` prefixes from field names throughout `value`.
pub fn strip_alias_prefixes(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(strip_alias_prefixes).collect()),
        Value::Object(object) => {
            let prefix = object
                .get(TYPENAME)
                .and_then(Value::as_str)
                .map(|type_name| format!("{type_name}__"));

            let mut stripped = Map::with_capacity(object.len());
            for (key, field) in object {
                let name = prefix
                    .as_deref()
                    .and_then(|prefix| key.strip_prefix(prefix))
                    .filter(|rest| !rest.is_empty())
                    .unwrap_or(key.as_str());
                stripped.insert(name.to_string(), strip_alias_prefixes(field));
            }
            Value::Object(stripped)
        }
        other => other.clone(),
    }
}

/// Attaches `__context` to every node carrying a `__typename`.
pub fn decorate_with_preview_context(value: &Value, context: &PreviewContext) -> Value {
    let context_value = serde_json::json!({
        "edit": context.edit,
        "preview_token": context.preview_token,
    });
    decorate(value, &context_value)
}

fn decorate(value: &Value, context: &Value) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| decorate(item, context)).collect())
        }
        Value::Object(object) => {
            let mut decorated: Map<String, Value> = object
                .iter()
                .filter(|(key, _)| key.as_str() != CONTEXT)
                .map(|(key, field)| (key.clone(), decorate(field, context)))
                .collect();
            if object.contains_key(TYPENAME) {
                decorated.insert(CONTEXT.to_string(), context.clone());
            } else if let Some(existing) = object.get(CONTEXT) {
                decorated.insert(CONTEXT.to_string(), existing.clone());
            }
            Value::Object(decorated)
        }
        other => other.clone(),
    }
}
