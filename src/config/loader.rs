//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{BlindfoldConfig, ClientConfig, ClientSettings};
use super::secret::secret_string;
use crate::domain::errors::BlindfoldError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BlindfoldConfig
/// 4. Applies environment variable overrides (BLINDFOLD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`BlindfoldError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use blindfold::config::loader::load_config;
///
/// let config = load_config("blindfold.toml").expect("Failed to load config");
/// let client_config = config.client.to_client_config().expect("Invalid client settings");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BlindfoldConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BlindfoldError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BlindfoldError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BlindfoldConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BlindfoldError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

impl ClientConfig {
    /// Builds a configuration from `BLINDFOLD_*` environment variables only
    ///
    /// `BLINDFOLD_API_KEY` is required; `BLINDFOLD_BASE_URL`, `BLINDFOLD_REGION`,
    /// `BLINDFOLD_USER_ID`, `BLINDFOLD_TIMEOUT`, `BLINDFOLD_MAX_RETRIES` and
    /// `BLINDFOLD_RETRY_DELAY` are optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or a value is invalid.
    pub fn from_env() -> Result<ClientConfig> {
        let mut settings = ClientSettings::default();
        apply_client_overrides(&mut settings)?;
        settings.to_client_config()
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BlindfoldError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }

            re.replace_all(line, |cap: &Captures<'_>| {
                let var_name = &cap[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        cap[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(BlindfoldError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the BLINDFOLD_* prefix
fn apply_env_overrides(config: &mut BlindfoldConfig) -> Result<()> {
    apply_client_overrides(&mut config.client)?;

    if let Ok(val) = std::env::var("BLINDFOLD_LOG_LEVEL") {
        config.logging.level = val;
    }
    if let Ok(val) = std::env::var("BLINDFOLD_LOG_JSON") {
        config.logging.json = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BLINDFOLD_LOG_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BLINDFOLD_LOG_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn apply_client_overrides(client: &mut ClientSettings) -> Result<()> {
    if let Ok(val) = std::env::var("BLINDFOLD_API_KEY") {
        client.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("BLINDFOLD_BASE_URL") {
        client.base_url = val;
    }
    if let Ok(val) = std::env::var("BLINDFOLD_REGION") {
        client.region = Some(val);
    }
    if let Ok(val) = std::env::var("BLINDFOLD_USER_ID") {
        client.user_id = Some(val);
    }
    if let Some(timeout) = parse_env("BLINDFOLD_TIMEOUT")? {
        client.timeout_seconds = timeout;
    }
    if let Some(retries) = parse_env("BLINDFOLD_MAX_RETRIES")? {
        client.max_retries = retries;
    }
    if let Some(delay) = parse_env("BLINDFOLD_RETRY_DELAY")? {
        client.retry_delay_seconds = delay;
    }

    Ok(())
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            BlindfoldError::Configuration(format!("Invalid value for {name}: '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("BLINDFOLD_LOADER_TEST_VAR", "test_value");
        let input = "api_key = \"${BLINDFOLD_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"");
        std::env::remove_var("BLINDFOLD_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("BLINDFOLD_LOADER_MISSING_VAR");
        let input = "api_key = \"${BLINDFOLD_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("BLINDFOLD_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("BLINDFOLD_LOADER_COMMENTED_VAR");
        let input = "# api_key = \"${BLINDFOLD_LOADER_COMMENTED_VAR}\"\nregion = \"eu\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(BlindfoldError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[client]
api_key = "file-key"
region = "eu"
timeout_seconds = 10.0
max_retries = 4

[logging]
level = "debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.client.api_key.as_ref().unwrap().expose_secret(),
            "file-key"
        );
        assert_eq!(config.client.region.as_deref(), Some("eu"));
        assert_eq!(config.client.max_retries, 4);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[client\napi_key = ").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_parse_env_invalid_number() {
        std::env::set_var("BLINDFOLD_LOADER_BAD_NUMBER", "soon");
        let result: Result<Option<u32>> = parse_env("BLINDFOLD_LOADER_BAD_NUMBER");
        assert!(result.is_err());
        std::env::remove_var("BLINDFOLD_LOADER_BAD_NUMBER");
    }

    #[test]
    fn test_parse_env_unset() {
        std::env::remove_var("BLINDFOLD_LOADER_UNSET");
        let result: Option<f64> = parse_env("BLINDFOLD_LOADER_UNSET").unwrap();
        assert_eq!(result, None);
    }
}
