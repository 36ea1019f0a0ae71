use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One archive record as returned by the report endpoint.
///
/// The endpoint's field set is open-ended, so the card keeps the raw JSON
/// object and only decides what is worth showing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportCard(pub BTreeMap<String, Value>);

impl ReportCard {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Fields with something to display, rendered as text, in key order.
    ///
    /// Nulls, blank strings and empty arrays or objects are skipped.
    pub fn non_empty_fields(&self) -> Vec<(&str, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| render(v).map(|text| (k.as_str(), text)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty_fields().is_empty()
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(_) => Some(value.to_string()),
    }
}
