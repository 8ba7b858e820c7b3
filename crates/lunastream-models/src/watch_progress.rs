use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Last known progress payload reported by an embed provider
///
/// The payload is kept as an open JSON object: providers send different
/// fields and new ones must survive a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProgressEntry {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Epoch milliseconds of the last merge
    pub last_updated: i64,
}

impl WatchProgressEntry {
    pub fn media_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }

    /// Shallow-merge `update` over the stored payload
    pub fn merge(&mut self, update: Map<String, Value>, now: i64) {
        for (key, value) in update {
            self.payload.insert(key, value);
        }
        self.payload.remove("last_updated");
        self.last_updated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_unmentioned_fields() {
        let mut entry = WatchProgressEntry {
            payload: json!({"id": "42", "type": "movie", "progress": {"watched": 10}})
                .as_object()
                .cloned()
                .unwrap(),
            last_updated: 1,
        };
        let update = json!({"id": "42", "type": "movie", "duration": 7200})
            .as_object()
            .cloned()
            .unwrap();

        entry.merge(update, 5);

        assert_eq!(entry.last_updated, 5);
        assert_eq!(entry.payload["duration"], 7200);
        assert_eq!(entry.payload["progress"]["watched"], 10);
        assert_eq!(entry.media_type(), Some("movie"));
    }
}
