use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One match returned by a vector index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Identifier of the stored vector
    #[serde(default)]
    pub id: String,
    /// Similarity reported by the index
    #[serde(default)]
    pub score: f32,
    /// Metadata stored alongside the vector; carries the chunk text
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievedChunk {
    pub fn new(id: impl Into<String>, score: f32, metadata: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            score,
            metadata,
        }
    }

    /// Text of the first field in `fields` holding a non-empty string.
    ///
    /// Non-string metadata values are ignored. Returns `""` when nothing matches.
    pub fn text<S: AsRef<str>>(&self, fields: &[S]) -> &str {
        fields
            .iter()
            .filter_map(|field| self.metadata.get(field.as_ref()))
            .filter_map(Value::as_str)
            .find(|text| !text.is_empty())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(metadata: Value) -> RetrievedChunk {
        let metadata = metadata.as_object().cloned().unwrap_or_default();
        RetrievedChunk::new("id", 0.5, metadata)
    }

    const FIELDS: [&str; 2] = ["pageContent", "text"];

    #[test]
    fn test_first_field_wins() {
        let c = chunk(json!({ "pageContent": "A", "text": "B" }));
        assert_eq!(c.text(&FIELDS), "A");
    }

    #[test]
    fn test_falls_back_past_empty_and_missing() {
        assert_eq!(chunk(json!({ "text": "B" })).text(&FIELDS), "B");
        assert_eq!(chunk(json!({ "pageContent": "", "text": "B" })).text(&FIELDS), "B");
        assert_eq!(chunk(json!({ "pageContent": 42, "text": "B" })).text(&FIELDS), "B");
    }

    #[test]
    fn test_nothing_present_is_empty() {
        assert_eq!(chunk(json!({})).text(&FIELDS), "");
        assert_eq!(chunk(json!({ "source": "DSA.pdf" })).text(&FIELDS), "");
    }

    #[test]
    fn test_deserializes_without_metadata() {
        let c: RetrievedChunk = serde_json::from_str(r#"{"id":"c-1","score":0.91}"#).unwrap();
        assert!(c.metadata.is_empty());
        assert_eq!(c.text(&FIELDS), "");
    }
}
