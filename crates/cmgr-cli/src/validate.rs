//! # Validate Subcommand
//!
//! Checks content-type descriptor files the same way the API server does at
//! startup: JSON Schema first, then the field declaration rules, then uid
//! uniqueness across everything checked in one run.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cmgr_core::ValidatorRegistry;
use cmgr_schema::{ContentType, DescriptorValidator};

/// Arguments for the `cmgr validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Descriptor files (`.yaml`, `.yml`, `.json`) or directories of them.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Outcome of validating a set of descriptors.
#[derive(Debug, Default)]
pub struct ValidationSummary {
    /// Uids of the content types that compiled.
    pub passed: Vec<String>,
    /// Descriptors that failed, with the rendered reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl ValidationSummary {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every descriptor passes, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let summary = validate_paths(&args.paths)?;

    println!(
        "Content types: {}/{} passed",
        summary.passed.len(),
        summary.total()
    );
    for uid in &summary.passed {
        println!("  OK: {uid}");
    }
    for (path, reason) in &summary.failures {
        println!("  FAIL: {}: {reason}", path.display());
    }

    Ok(if summary.is_clean() { 0 } else { 1 })
}

/// Validate every descriptor named by `paths`.
///
/// Directories are scanned (non-recursively) for descriptor files.
pub fn validate_paths(paths: &[PathBuf]) -> Result<ValidationSummary> {
    let validator = DescriptorValidator::new().context("failed to compile descriptor schema")?;
    let registry = ValidatorRegistry::standard();

    let mut summary = ValidationSummary::default();
    let mut compiled: Vec<(PathBuf, ContentType)> = Vec::new();

    for path in paths {
        if path.is_dir() {
            let report = validator
                .load_dir(path, &registry)
                .with_context(|| format!("failed to read directory {}", path.display()))?;
            tracing::info!(dir = %path.display(), total = report.total(), "scanned directory");
            // load_dir does not keep the path of loaded descriptors.
            compiled.extend(report.loaded.into_iter().map(|ct| (path.clone(), ct)));
            summary.failures.extend(
                report
                    .failures
                    .into_iter()
                    .map(|(p, err)| (p, err.to_string())),
            );
        } else {
            match validator.load_content_type(path, &registry) {
                Ok(ct) => compiled.push((path.clone(), ct)),
                Err(err) => summary.failures.push((path.clone(), err.to_string())),
            }
        }
    }

    check_unique_uids(compiled, &mut summary);
    Ok(summary)
}

/// Move compiled content types into `summary`, flagging repeated uids.
fn check_unique_uids(compiled: Vec<(PathBuf, ContentType)>, summary: &mut ValidationSummary) {
    let mut seen = BTreeSet::new();
    for (path, ct) in compiled {
        let uid = ct.uid().to_string();
        if seen.insert(uid.clone()) {
            summary.passed.push(uid);
        } else {
            summary.failures.push((
                path,
                format!("content type \"{uid}\" is registered more than once"),
            ));
        }
    }
}
