//! Loosely-typed extractor records
//!
//! yt-dlp emits different keys for videos, flat playlist entries and channel
//! listings, and the set changes between releases. Everything here is an
//! optional lookup with the caller choosing the default.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One JSON object as printed by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Record holding nothing but an `id`.
    pub fn with_id(id: &str) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(id.to_string()));
        Self(Value::Object(map))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// True when the key exists, whatever its value.
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some()
    }

    /// True when the key exists and is not JSON `null`.
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    /// Textual form of a scalar field, or `None` when the field is missing or
    /// falsy (`null`, `""`, `false`, `0`).
    ///
    /// Numbers are rendered through their integral part so that a float
    /// duration such as `212.0` reads as `"212"`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    (i != 0).then(|| i.to_string())
                } else if let Some(u) = n.as_u64() {
                    (u != 0).then(|| u.to_string())
                } else {
                    let f = n.as_f64()?;
                    (f.is_finite() && f != 0.0).then(|| format!("{}", f.trunc()))
                }
            }
            Value::Bool(true) => Some("True".to_string()),
            _ => None,
        }
    }

    /// First truthy field among `keys`.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k))
    }

    /// Nested records under `entries`, skipping `null` placeholders that the
    /// extractor leaves for unavailable items.
    pub fn entries(&self) -> Vec<RawRecord> {
        self.0
            .get("entries")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .cloned()
                    .map(RawRecord)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_falsy_values() {
        let raw = RawRecord::new(json!({
            "title": "",
            "duration": 0,
            "uploader": null,
            "id": "abc",
        }));
        assert_eq!(raw.text("title"), None);
        assert_eq!(raw.text("duration"), None);
        assert_eq!(raw.text("uploader"), None);
        assert_eq!(raw.text("missing"), None);
        assert_eq!(raw.text("id").as_deref(), Some("abc"));
    }

    #[test]
    fn test_text_numbers() {
        let raw = RawRecord::new(json!({"duration": 212.7, "timestamp": 1700000000}));
        assert_eq!(raw.text("duration").as_deref(), Some("212"));
        assert_eq!(raw.text("timestamp").as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_first_text_fallback() {
        let raw = RawRecord::new(json!({"channel": null, "uploader": "Someone"}));
        assert_eq!(raw.first_text(&["channel", "uploader"]).as_deref(), Some("Someone"));
    }

    #[test]
    fn test_entries_skip_nulls() {
        let raw = RawRecord::new(json!({"entries": [{"id": "a"}, null, {"id": "b"}]}));
        let entries = raw.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text("id").as_deref(), Some("b"));
        assert!(RawRecord::default().entries().is_empty());
    }

    #[test]
    fn test_presence() {
        let raw = RawRecord::new(json!({"title": null}));
        assert!(raw.has("title"));
        assert!(!raw.is_present("title"));
        assert!(RawRecord::with_id("x").is_present("id"));
    }
}
