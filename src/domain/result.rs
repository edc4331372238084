//! Result type alias for Blindfold
//!
//! This module provides a convenient Result type alias that uses
//! [`BlindfoldError`] as the error type.

use super::errors::BlindfoldError;

/// Result type alias for Blindfold operations
///
/// # Examples
///
/// ```
/// use blindfold::domain::result::Result;
/// use blindfold::domain::errors::BlindfoldError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BlindfoldError::Configuration("api_key cannot be empty".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BlindfoldError>;
