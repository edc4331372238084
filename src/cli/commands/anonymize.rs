//! Remote anonymization commands
//!
//! `tokenize`, `detect`, `redact`, `mask`, `synthesize`, `hash` and `encrypt`
//! share the text and filtering arguments. One `--text` calls the single-text
//! endpoint; several use the batch endpoint. Results are printed as JSON.

use crate::cli::{exit_code, resolve_client_config, Commands};
use crate::client::{
    AdditionalOptions, AsyncBlindfold, CommonOptions, EncryptOptions, HashOptions, MaskOptions,
    RedactOptions, SynthesizeOptions,
};
use crate::config::secret_string_opt;
use crate::domain::{BlindfoldError, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

/// Text and filtering arguments shared by every remote command
#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// Text to process; repeat to process several texts in one batch request
    #[arg(short, long = "text", required = true)]
    pub texts: Vec<String>,

    /// Entity type to detect (repeatable), e.g. "person"
    #[arg(short, long = "entity")]
    pub entities: Vec<String>,

    /// Minimum confidence score (0.0 to 1.0)
    #[arg(long)]
    pub score_threshold: Option<f64>,

    /// Server-side policy, e.g. gdpr_eu, hipaa_us, basic
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Extra request field as key=value; JSON values are sent as JSON
    #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
    pub options: Vec<(String, Value)>,
}

impl TextArgs {
    /// Shared request options
    pub fn common_options(&self) -> CommonOptions {
        let additional: AdditionalOptions = self.options.iter().cloned().collect();

        CommonOptions {
            entities: (!self.entities.is_empty()).then(|| self.entities.clone()),
            score_threshold: self.score_threshold,
            policy: self.policy.clone(),
            additional,
        }
    }
}

/// Arguments for the redact command
#[derive(Args, Debug, Clone)]
pub struct RedactArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Replacement character(s)
    #[arg(long, default_value = "*")]
    pub masking_char: String,
}

/// Arguments for the mask command
#[derive(Args, Debug, Clone)]
pub struct MaskArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Number of characters left visible
    #[arg(long, default_value_t = 3)]
    pub chars_to_show: u32,

    /// Keep the visible characters at the end
    #[arg(long)]
    pub from_end: bool,

    /// Masking character(s)
    #[arg(long, default_value = "*")]
    pub masking_char: String,
}

/// Arguments for the synthesize command
#[derive(Args, Debug, Clone)]
pub struct SynthesizeArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Language of the synthetic data
    #[arg(long, default_value = "en")]
    pub language: String,
}

/// Arguments for the hash command
#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Hash algorithm
    #[arg(long, default_value = "sha256")]
    pub hash_type: String,

    /// Prefix put in front of every hash
    #[arg(long, default_value = "HASH_")]
    pub hash_prefix: String,

    /// Number of hash characters kept
    #[arg(long, default_value_t = 16)]
    pub hash_length: u32,
}

/// Arguments for the encrypt command
#[derive(Args, Debug, Clone)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Encryption key; the tenant key is used when omitted
    #[arg(long, env = "BLINDFOLD_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: Option<String>,
}

/// Calls the single-text method for one text, the batch method otherwise
macro_rules! single_or_batch {
    ($client:expr, $single:ident, $batch:ident, $texts:expr, $options:expr) => {
        match $texts.as_slice() {
            [text] => to_json($client.$single(text, $options).await?),
            texts => to_json($client.$batch(texts, $options).await?),
        }
    };
}

/// Executes a remote command and prints its result
///
/// Returns the process exit code.
pub async fn execute(command: &Commands, config_path: &str) -> anyhow::Result<i32> {
    let client = match resolve_client_config(config_path).and_then(AsyncBlindfold::with_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {e}");
            return Ok(exit_code(&e));
        }
    };

    let result = dispatch(&client, command).await;
    client.close();

    match result {
        Ok(Some(value)) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(0)
        }
        Ok(None) => anyhow::bail!("not a remote command: {command:?}"),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("❌ {e}");
            Ok(exit_code(&e))
        }
    }
}

async fn dispatch(client: &AsyncBlindfold, command: &Commands) -> Result<Option<Value>> {
    let value = match command {
        Commands::Tokenize(args) => {
            single_or_batch!(client, tokenize, tokenize_batch, args.texts, &args.common_options())
        }
        Commands::Detect(args) => {
            single_or_batch!(client, detect, detect_batch, args.texts, &args.common_options())
        }
        Commands::Redact(args) => {
            let options = RedactOptions {
                masking_char: args.masking_char.clone(),
                common: args.text.common_options(),
            };
            single_or_batch!(client, redact, redact_batch, args.text.texts, &options)
        }
        Commands::Mask(args) => {
            let options = MaskOptions {
                chars_to_show: args.chars_to_show,
                from_end: args.from_end,
                masking_char: args.masking_char.clone(),
                common: args.text.common_options(),
            };
            single_or_batch!(client, mask, mask_batch, args.text.texts, &options)
        }
        Commands::Synthesize(args) => {
            let options = SynthesizeOptions {
                language: args.language.clone(),
                common: args.text.common_options(),
            };
            single_or_batch!(client, synthesize, synthesize_batch, args.text.texts, &options)
        }
        Commands::Hash(args) => {
            let options = HashOptions {
                hash_type: args.hash_type.clone(),
                hash_prefix: args.hash_prefix.clone(),
                hash_length: args.hash_length,
                common: args.text.common_options(),
            };
            single_or_batch!(client, hash, hash_batch, args.text.texts, &options)
        }
        Commands::Encrypt(args) => {
            let options = EncryptOptions {
                encryption_key: secret_string_opt(args.encryption_key.clone()),
                common: args.text.common_options(),
            };
            single_or_batch!(client, encrypt, encrypt_batch, args.text.texts, &options)
        }
        Commands::Detokenize(_) | Commands::ValidateConfig(_) => return Ok(None),
    };

    value.map(Some)
}

fn to_json<T: Serialize>(response: T) -> Result<Value> {
    serde_json::to_value(response).map_err(|e| BlindfoldError::Api {
        message: format!("Failed to serialize response: {e}"),
        status_code: 200,
        response_body: None,
    })
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
