//! Detokenize command implementation
//!
//! Restores original values locally from a JSON token mapping; no API key is
//! needed and no request is made.

use crate::cli::EXIT_CONFIGURATION;
use crate::core::detokenize;
use crate::domain::TokenMapping;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the detokenize command
#[derive(Args, Debug, Clone)]
pub struct DetokenizeArgs {
    /// Tokenized text
    #[arg(short, long)]
    pub text: String,

    /// JSON file holding the token mapping, e.g. {"<Person_1>": "John Doe"}
    #[arg(short, long)]
    pub mapping: PathBuf,
}

impl DetokenizeArgs {
    /// Execute the detokenize command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let mapping = match self.read_mapping() {
            Ok(mapping) => mapping,
            Err(e) => {
                eprintln!("❌ Failed to read token mapping {}", self.mapping.display());
                eprintln!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let result = detokenize(&self.text, &mapping);
        tracing::info!(
            tokens = mapping.len(),
            replacements_made = result.replacements_made,
            "Detokenized text"
        );

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(0)
    }

    fn read_mapping(&self) -> anyhow::Result<TokenMapping> {
        let contents = std::fs::read_to_string(&self.mapping)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detokenize_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"<Person_1>": "Bob", "<Person_10>": "Charlie"}"#)
            .unwrap();
        file.flush().unwrap();

        let args = DetokenizeArgs {
            text: "<Person_1> and <Person_10> are friends".to_string(),
            mapping: file.path().to_path_buf(),
        };
        assert_eq!(args.read_mapping().unwrap().len(), 2);
        assert_eq!(args.execute().unwrap(), 0);
    }

    #[test]
    fn test_missing_mapping_file() {
        let args = DetokenizeArgs {
            text: "x".to_string(),
            mapping: PathBuf::from("/nonexistent/mapping.json"),
        };
        assert_eq!(args.execute().unwrap(), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_invalid_mapping_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();
        file.flush().unwrap();

        let args = DetokenizeArgs {
            text: "x".to_string(),
            mapping: file.path().to_path_buf(),
        };
        assert!(args.read_mapping().is_err());
    }
}
