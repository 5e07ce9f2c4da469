use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldItem {
    pub key: String,
    pub label: String,
    pub value: String,
}

static FIELD_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("description", "Description"),
        ("technology", "Technology"),
        ("owner", "Owner"),
        ("criticality", "Criticality"),
        ("priority", "Priority"),
        ("status", "Status"),
        ("stakeholderType", "Stakeholder Type"),
        ("apiVersion", "API Version"),
        ("url", "URL"),
        ("sla", "SLA"),
        ("kpi", "KPI"),
        ("dataClassification", "Data Classification"),
        ("primaryKey", "Primary Key"),
    ])
});

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

pub fn field_label(key: &str) -> String {
    if let Some(label) = FIELD_LABELS.get(key) {
        return (*label).to_string();
    }
    let spaced = CAMEL_BOUNDARY.replace_all(key, "$1 $2");
    spaced
        .split(|ch: char| ch == '_' || ch == '-' || ch.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(display_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// Field items for a property bag, in property order except that `leading`
/// keys come first. Keys in `skip`, `_`-prefixed keys, nulls, and nested
/// objects produce nothing.
pub fn extract_field_items(
    properties: &Map<String, Value>,
    leading: &[&str],
    skip: &[&str],
) -> Vec<FieldItem> {
    let displayable = |key: &str| !key.starts_with('_') && !skip.contains(&key);

    let leading_items = leading
        .iter()
        .filter_map(|key| properties.get(*key).map(|value| (*key, value)));
    let rest = properties
        .iter()
        .map(|(key, value)| (key.as_str(), value))
        .filter(|(key, _)| !leading.contains(key));

    leading_items
        .chain(rest)
        .filter(|(key, _)| displayable(*key))
        .filter_map(|(key, value)| {
            Some(FieldItem {
                key: key.to_string(),
                label: field_label(key),
                value: display_value(value)?,
            })
        })
        .collect()
}
