//! Per-operation request options
//!
//! Every remote call accepts [`CommonOptions`]; operations with extra
//! parameters wrap them in their own options type. Only options that are set
//! are sent. [`AdditionalOptions`] is merged into the body last and may not
//! reuse the name of a parameter the client already sends.

use crate::config::secret::SecretString;
use secrecy::ExposeSecret;
use serde_json::{json, Map, Value};

/// Free-form extra request fields
pub type AdditionalOptions = Map<String, Value>;

/// Parameter names owned by the client; extra fields may not reuse them
pub(crate) const RESERVED_FIELDS: &[&str] = &[
    "text",
    "texts",
    "entities",
    "score_threshold",
    "policy",
    "masking_char",
    "chars_to_show",
    "from_end",
    "language",
    "hash_type",
    "hash_prefix",
    "hash_length",
    "encryption_key",
];

/// Options shared by every remote operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonOptions {
    /// Entity types to detect, e.g. `["person", "email address"]`
    pub entities: Option<Vec<String>>,

    /// Minimum confidence score (0.0 to 1.0)
    pub score_threshold: Option<f64>,

    /// Named server-side policy, e.g. `gdpr_eu`
    pub policy: Option<String>,

    /// Extra fields merged into the request body
    pub additional: AdditionalOptions,
}

impl CommonOptions {
    /// Restrict detection to the given entity types
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    /// Minimum confidence score
    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = Some(score_threshold);
        self
    }

    /// Server-side policy name
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Adds an extra request field
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional.insert(key.into(), value.into());
        self
    }

    pub(crate) fn write_to(&self, body: &mut Map<String, Value>) {
        if let Some(ref entities) = self.entities {
            body.insert("entities".to_string(), json!(entities));
        }
        if let Some(score_threshold) = self.score_threshold {
            body.insert("score_threshold".to_string(), json!(score_threshold));
        }
        if let Some(ref policy) = self.policy {
            body.insert("policy".to_string(), json!(policy));
        }
    }
}

/// Options accepted by an operation
pub trait OperationOptions {
    /// Shared options
    fn common(&self) -> &CommonOptions;

    /// Writes the operation's own parameters into the request body
    fn write_named(&self, _body: &mut Map<String, Value>) {}
}

impl OperationOptions for CommonOptions {
    fn common(&self) -> &CommonOptions {
        self
    }
}

/// Options for `redact`
#[derive(Debug, Clone, PartialEq)]
pub struct RedactOptions {
    /// Replacement character(s)
    pub masking_char: String,
    /// Shared options
    pub common: CommonOptions,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            masking_char: "*".to_string(),
            common: CommonOptions::default(),
        }
    }
}

impl OperationOptions for RedactOptions {
    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn write_named(&self, body: &mut Map<String, Value>) {
        body.insert("masking_char".to_string(), json!(self.masking_char));
    }
}

/// Options for `mask`
#[derive(Debug, Clone, PartialEq)]
pub struct MaskOptions {
    /// Number of characters left visible
    pub chars_to_show: u32,
    /// Keep the visible characters at the end instead of the start
    pub from_end: bool,
    /// Masking character(s)
    pub masking_char: String,
    /// Shared options
    pub common: CommonOptions,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            chars_to_show: 3,
            from_end: false,
            masking_char: "*".to_string(),
            common: CommonOptions::default(),
        }
    }
}

impl OperationOptions for MaskOptions {
    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn write_named(&self, body: &mut Map<String, Value>) {
        body.insert("chars_to_show".to_string(), json!(self.chars_to_show));
        body.insert("from_end".to_string(), json!(self.from_end));
        body.insert("masking_char".to_string(), json!(self.masking_char));
    }
}

/// Options for `synthesize`
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizeOptions {
    /// Language of the generated replacement data
    pub language: String,
    /// Shared options
    pub common: CommonOptions,
}

impl Default for SynthesizeOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            common: CommonOptions::default(),
        }
    }
}

impl OperationOptions for SynthesizeOptions {
    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn write_named(&self, body: &mut Map<String, Value>) {
        body.insert("language".to_string(), json!(self.language));
    }
}

/// Options for `hash`
#[derive(Debug, Clone, PartialEq)]
pub struct HashOptions {
    /// Hash algorithm
    pub hash_type: String,
    /// Prefix put in front of every hash
    pub hash_prefix: String,
    /// Number of hash characters kept
    pub hash_length: u32,
    /// Shared options
    pub common: CommonOptions,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            hash_type: "sha256".to_string(),
            hash_prefix: "HASH_".to_string(),
            hash_length: 16,
            common: CommonOptions::default(),
        }
    }
}

impl OperationOptions for HashOptions {
    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn write_named(&self, body: &mut Map<String, Value>) {
        body.insert("hash_type".to_string(), json!(self.hash_type));
        body.insert("hash_prefix".to_string(), json!(self.hash_prefix));
        body.insert("hash_length".to_string(), json!(self.hash_length));
    }
}

/// Options for `encrypt`
///
/// Without a key the server uses the tenant key.
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    /// Encryption key; omitted from the request when unset or empty
    pub encryption_key: Option<SecretString>,
    /// Shared options
    pub common: CommonOptions,
}

impl EncryptOptions {
    /// Encrypt with the given key
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            encryption_key: Some(crate::config::secret_string(key.into())),
            common: CommonOptions::default(),
        }
    }
}

impl OperationOptions for EncryptOptions {
    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn write_named(&self, body: &mut Map<String, Value>) {
        if let Some(ref key) = self.encryption_key {
            let key: &str = key.expose_secret().as_ref();
            if !key.is_empty() {
                body.insert("encryption_key".to_string(), json!(key));
            }
        }
    }
}
