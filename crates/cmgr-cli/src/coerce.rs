//! # Coerce Subcommand
//!
//! Runs a write payload through a content type's field validators without
//! a server. Prints the field values that would be stored, or one line per
//! rejected field.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use cmgr_core::ValidatorRegistry;
use cmgr_schema::{validate_write, DescriptorValidator, FieldValues, PayloadError, WriteMode};

/// Arguments for the `cmgr coerce` subcommand.
#[derive(Args, Debug)]
pub struct CoerceArgs {
    /// Content-type descriptor file (`.yaml`, `.yml` or `.json`).
    #[arg(long, value_name = "FILE")]
    pub content_type: PathBuf,

    /// Payload as a JSON object, or `@path` to read it from a file.
    #[arg(long, value_name = "JSON")]
    pub data: String,

    /// Treat the payload as an update: absent fields are left out instead
    /// of taking their default.
    #[arg(long)]
    pub update: bool,
}

impl CoerceArgs {
    fn mode(&self) -> WriteMode {
        if self.update {
            WriteMode::Update
        } else {
            WriteMode::Create
        }
    }
}

/// Execute the coerce subcommand.
///
/// Returns exit code: 0 if the payload is accepted, 1 if it is rejected.
pub fn run_coerce(args: &CoerceArgs) -> Result<u8> {
    let payload = read_payload(&args.data)?;

    match coerce(args, &payload)? {
        Ok(values) => {
            let rendered: serde_json::Map<String, Value> = values
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            Ok(0)
        }
        Err(PayloadError::Rejected(errors)) => {
            println!("{} field(s) rejected:", errors.len());
            for err in &errors {
                println!("  {}: {} ({})", err.field, err.reason, err.reason.code());
            }
            Ok(1)
        }
        Err(err) => {
            println!("payload rejected: {err}");
            Ok(1)
        }
    }
}

/// Load the content type named by `args` and validate `payload` against it.
///
/// The outer `Result` fails on a bad descriptor; the inner one carries the
/// payload verdict.
pub fn coerce(
    args: &CoerceArgs,
    payload: &Value,
) -> Result<std::result::Result<FieldValues, PayloadError>> {
    let validator = DescriptorValidator::new().context("failed to compile descriptor schema")?;
    let content_type = validator
        .load_content_type(&args.content_type, &ValidatorRegistry::standard())
        .with_context(|| format!("failed to load {}", args.content_type.display()))?;

    tracing::info!(uid = %content_type.uid(), mode = ?args.mode(), "coercing payload");
    Ok(validate_write(&content_type, payload, args.mode()))
}

/// Parse `--data`: inline JSON, or `@path` naming a JSON file.
pub fn read_payload(data: &str) -> Result<Value> {
    let source = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {path}"))?,
        None => data.to_string(),
    };
    serde_json::from_str(&source).context("payload is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_payload_parses() {
        assert_eq!(read_payload(r#"{"field": 1}"#).unwrap(), json!({"field": 1}));
    }

    #[test]
    fn payload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, r#"{"field": "two"}"#).unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(read_payload(&arg).unwrap(), json!({"field": "two"}));
    }

    #[test]
    fn invalid_payload_is_error() {
        assert!(read_payload("{ nope").is_err());
        assert!(read_payload("@/definitely/not/here.json").is_err());
    }
}
