//! CLI command implementations

pub mod anonymize;
pub mod detokenize;
pub mod validate;
