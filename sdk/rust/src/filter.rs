//! `where` filters for `_Content` lookups.

use crate::preview::PreviewParams;
use serde_json::{json, Value};

/// Builds the variables matching content published at `path`.
///
/// A path matches with or without its trailing slash. When `host` is given
/// the match is narrowed to that site.
pub fn path_filter(path: &str, host: Option<&str>) -> Value {
    let trimmed = path.trim_end_matches('/');
    let alternatives: Vec<Value> = if trimmed.is_empty() {
        vec![url_default_eq("/")]
    } else {
        vec![url_default_eq(trimmed), url_default_eq(&format!("{trimmed}/"))]
    };

    let path_match = json!({ "_or": alternatives });
    let filter = match host {
        Some(host) => json!({
            "_and": [
                path_match,
                { "_metadata": { "url": { "base": { "eq": host } } } }
            ]
        }),
        None => path_match,
    };

    json!({ "where": filter })
}

/// Builds the variables matching the item a preview request points at.
pub fn preview_filter(params: &PreviewParams) -> Value {
    let mut metadata = serde_json::Map::new();
    metadata.insert("key".into(), json!({ "eq": params.key }));
    if let Some(ver) = &params.ver {
        metadata.insert("version".into(), json!({ "eq": ver }));
    }
    if let Some(loc) = &params.loc {
        metadata.insert("locale".into(), json!({ "eq": loc }));
    }

    json!({ "where": { "_metadata": metadata } })
}

fn url_default_eq(path: &str) -> Value {
    json!({ "_metadata": { "url": { "default": { "eq": path } } } })
}
