//! Response models for the Blindfold API
//!
//! Successful responses are deserialized into these types. Unknown fields are
//! ignored; missing required fields are reported by the client as an API error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Token to original value table returned by a tokenize call
///
/// A `BTreeMap` keeps enumeration order deterministic, which in turn keeps
/// detokenization of equal-length tokens deterministic.
pub type TokenMapping = BTreeMap<String, String>;

/// Entity detected in the submitted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    /// Entity type (e.g. "person", "email address", "phone number")
    pub entity_type: String,

    /// Original text of the entity
    pub text: String,

    /// Start index in the text
    pub start: usize,

    /// End index in the text
    pub end: usize,

    /// Confidence score (0-1)
    pub score: f64,
}

/// Response from the tokenize endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    /// Anonymized text with placeholders
    pub text: String,

    /// Mapping of tokens to original values
    pub mapping: TokenMapping,

    /// Detected entities
    pub detected_entities: Vec<DetectedEntity>,

    /// Number of detected entities
    pub entities_count: usize,
}

/// Response from the detect endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Detected entities
    pub detected_entities: Vec<DetectedEntity>,

    /// Number of detected entities
    pub entities_count: usize,
}

/// Response shared by the text-transforming endpoints
/// (redact, mask, synthesize, hash, encrypt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResponse {
    /// Transformed text
    pub text: String,

    /// Entities that were detected and transformed
    pub detected_entities: Vec<DetectedEntity>,

    /// Number of transformed entities
    pub entities_count: usize,
}

/// Response from the redact endpoint
pub type RedactResponse = TransformResponse;
/// Response from the mask endpoint
pub type MaskResponse = TransformResponse;
/// Response from the synthesize endpoint
pub type SynthesizeResponse = TransformResponse;
/// Response from the hash endpoint
pub type HashResponse = TransformResponse;
/// Response from the encrypt endpoint
pub type EncryptResponse = TransformResponse;

/// Result of a local detokenization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetokenizeResult {
    /// Text with every mapped token replaced by its original value
    pub text: String,

    /// Total number of individual substring replacements
    pub replacements_made: usize,
}

/// Response from the batch endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Per-text results, or `{"error": "..."}` for items that failed
    pub results: Vec<Value>,

    /// Number of texts submitted
    pub total: usize,

    /// Number of texts processed successfully
    pub succeeded: usize,

    /// Number of texts that failed
    pub failed: usize,
}

impl BatchResponse {
    /// Indices and messages of the items that failed
    pub fn errors(&self) -> Vec<(usize, &str)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.get("error")
                    .map(|error| (index, error.as_str().unwrap_or_default()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize_response_deserialize() {
        let body = json!({
            "text": "<Person_1> called",
            "mapping": {"<Person_1>": "John Doe"},
            "detected_entities": [
                {"entity_type": "person", "text": "John Doe", "start": 0, "end": 8, "score": 0.95}
            ],
            "entities_count": 1,
            "request_id": "ignored"
        });

        let response: TokenizeResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.text, "<Person_1> called");
        assert_eq!(response.mapping["<Person_1>"], "John Doe");
        assert_eq!(response.detected_entities[0].end, 8);
    }

    #[test]
    fn test_transform_response_requires_fields() {
        let body = json!({"text": "***"});
        assert!(serde_json::from_value::<TransformResponse>(body).is_err());
    }

    #[test]
    fn test_batch_errors() {
        let batch: BatchResponse = serde_json::from_value(json!({
            "results": [
                {"text": "<Person_1>", "mapping": {}, "detected_entities": [], "entities_count": 1},
                {"error": "Processing failed"}
            ],
            "total": 2,
            "succeeded": 1,
            "failed": 1
        }))
        .unwrap();

        assert_eq!(batch.errors(), vec![(1, "Processing failed")]);
    }
}
