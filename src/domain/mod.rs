//! Domain models and types for Blindfold.
//!
//! The domain layer provides:
//! - **Error types** ([`BlindfoldError`], [`TransportError`])
//! - **Result type alias** ([`Result`])
//! - **Response models** ([`TokenizeResponse`], [`DetectResponse`], [`TransformResponse`],
//!   [`BatchResponse`], [`DetokenizeResult`])
//!
//! # Error Handling
//!
//! Remote calls fail with exactly one of three kinds, so callers can branch with
//! an exhaustive match:
//!
//! ```rust
//! use blindfold::domain::BlindfoldError;
//!
//! fn describe(err: &BlindfoldError) -> &'static str {
//!     match err {
//!         BlindfoldError::Authentication(_) => "check your API key",
//!         BlindfoldError::Api { .. } => "the service rejected the request",
//!         BlindfoldError::Network { .. } => "the service could not be reached",
//!         BlindfoldError::Configuration(_) => "the client is misconfigured",
//!     }
//! }
//! ```

pub mod errors;
pub mod models;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BlindfoldError, TransportError};
pub use models::{
    BatchResponse, DetectResponse, DetectedEntity, DetokenizeResult, EncryptResponse,
    HashResponse, MaskResponse, RedactResponse, SynthesizeResponse, TokenMapping,
    TokenizeResponse, TransformResponse,
};
pub use result::Result;
