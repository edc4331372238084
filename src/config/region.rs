//! Region to base URL resolution
//!
//! The service runs in a fixed set of regions. A client picks its base URL as
//! follows:
//!
//! 1. an explicit base URL other than [`DEFAULT_BASE_URL`] is used as given
//!    (trailing slashes trimmed), whatever the region
//! 2. otherwise a region, matched case-insensitively, selects its URL
//! 3. otherwise [`DEFAULT_BASE_URL`] is used
//!
//! An unknown region is rejected even when an explicit base URL wins.

use crate::domain::{BlindfoldError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global production endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.blindfold.dev/api/public/v1";

/// EU endpoint
pub const EU_BASE_URL: &str = "https://eu-api.blindfold.dev/api/public/v1";

/// US endpoint
pub const US_BASE_URL: &str = "https://us-api.blindfold.dev/api/public/v1";

/// Deployment region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// European Union
    Eu,
    /// United States
    Us,
}

impl Region {
    /// All supported regions
    pub const ALL: [Region; 2] = [Region::Eu, Region::Us];

    /// Region code
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Us => "us",
        }
    }

    /// Base URL of the region
    pub fn base_url(self) -> &'static str {
        match self {
            Region::Eu => EU_BASE_URL,
            Region::Us => US_BASE_URL,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = BlindfoldError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
                BlindfoldError::Configuration(format!(
                    "Invalid region '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Resolves the base URL from an explicit URL and an optional region code
///
/// # Errors
///
/// Returns [`BlindfoldError::Configuration`] if `region` is not a known region.
///
/// # Example
///
/// ```
/// use blindfold::config::region::{resolve_base_url, DEFAULT_BASE_URL, EU_BASE_URL};
///
/// assert_eq!(resolve_base_url(DEFAULT_BASE_URL, Some("EU")).unwrap(), EU_BASE_URL);
/// assert_eq!(
///     resolve_base_url("https://custom.api.dev/v1/", Some("us")).unwrap(),
///     "https://custom.api.dev/v1"
/// );
/// assert!(resolve_base_url(DEFAULT_BASE_URL, Some("ap")).is_err());
/// ```
pub fn resolve_base_url(explicit_base_url: &str, region: Option<&str>) -> Result<String> {
    let region = region.map(str::parse::<Region>).transpose()?;
    Ok(resolve_with_region(explicit_base_url, region))
}

/// Same as [`resolve_base_url`] for an already validated region
pub fn resolve_with_region(explicit_base_url: &str, region: Option<Region>) -> String {
    let trimmed = explicit_base_url.trim_end_matches('/');

    match region {
        Some(region) if trimmed == DEFAULT_BASE_URL => region.base_url().to_string(),
        _ => trimmed.to_string(),
    }
}
