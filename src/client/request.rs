//! Request body assembly and response decoding shared by both clients

use super::options::{OperationOptions, RESERVED_FIELDS};
use crate::domain::{BlindfoldError, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::fmt;

/// Remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Tokenize,
    Detect,
    Redact,
    Mask,
    Synthesize,
    Hash,
    Encrypt,
}

impl Operation {
    /// All remote operations
    pub const ALL: [Operation; 7] = [
        Operation::Tokenize,
        Operation::Detect,
        Operation::Redact,
        Operation::Mask,
        Operation::Synthesize,
        Operation::Hash,
        Operation::Encrypt,
    ];

    /// Operation name as used in endpoint paths
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Tokenize => "tokenize",
            Operation::Detect => "detect",
            Operation::Redact => "redact",
            Operation::Mask => "mask",
            Operation::Synthesize => "synthesize",
            Operation::Hash => "hash",
            Operation::Encrypt => "encrypt",
        }
    }

    /// Single-text endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Tokenize => "/tokenize",
            Operation::Detect => "/detect",
            Operation::Redact => "/redact",
            Operation::Mask => "/mask",
            Operation::Synthesize => "/synthesize",
            Operation::Hash => "/hash",
            Operation::Encrypt => "/encrypt",
        }
    }

    /// Batch endpoint
    pub fn batch_endpoint(self) -> &'static str {
        match self {
            Operation::Tokenize => "/tokenize/batch",
            Operation::Detect => "/detect/batch",
            Operation::Redact => "/redact/batch",
            Operation::Mask => "/mask/batch",
            Operation::Synthesize => "/synthesize/batch",
            Operation::Hash => "/hash/batch",
            Operation::Encrypt => "/encrypt/batch",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text input of a call
#[derive(Debug, Clone, Copy)]
pub(crate) enum Input<'a> {
    Single(&'a str),
    Batch(&'a [&'a str]),
}

/// Builds the JSON body of a call
///
/// Order: the text field, the operation's own parameters, the shared options
/// that are set, then the extra fields.
pub(crate) fn build_payload<O>(input: Input<'_>, options: &O) -> Result<Value>
where
    O: OperationOptions + ?Sized,
{
    let mut body = Map::new();

    match input {
        Input::Single(text) => {
            body.insert("text".to_string(), json!(text));
        }
        Input::Batch(texts) => {
            body.insert("texts".to_string(), json!(texts));
        }
    }

    options.write_named(&mut body);

    let common = options.common();
    common.write_to(&mut body);

    for (key, value) in &common.additional {
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(BlindfoldError::Configuration(format!(
                "Additional option '{key}' collides with a named parameter"
            )));
        }
        body.insert(key.clone(), value.clone());
    }

    Ok(Value::Object(body))
}

/// Decodes a successful response into its typed model
///
/// A body that does not match the model is reported as an API error with
/// status 200 and the body attached.
pub(crate) fn parse_model<T: DeserializeOwned>(value: Value) -> Result<T> {
    match T::deserialize(&value) {
        Ok(model) => Ok(model),
        Err(e) => Err(BlindfoldError::Api {
            message: format!("Invalid response format: {e}"),
            status_code: 200,
            response_body: Some(value),
        }),
    }
}
