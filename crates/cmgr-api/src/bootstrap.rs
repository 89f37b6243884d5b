//! # Content-Type Bootstrap
//!
//! Builds the application state at startup.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Descriptors**: read every `*.yaml`, `*.yml` and `*.json` file
//!    in `CONTENT_TYPES_DIR`, check it against the descriptor schema, and
//!    compile it with the standard validator registry.
//! 2. **Register**: collect the compiled content types into a
//!    [`ContentTypeRegistry`], rejecting duplicate uids.
//! 3. **Log Banner**: one line per served content type.
//!
//! A descriptor that fails to load aborts startup; the server never serves
//! a partial set of content types. If `CONTENT_TYPES_DIR` is unset the
//! server starts with an empty registry.

use std::path::{Path, PathBuf};

use cmgr_core::ValidatorRegistry;
use cmgr_schema::{ContentType, ContentTypeRegistry, DescriptorValidator, SchemaError};

use crate::state::{AppConfig, AppState};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// `CONTENT_TYPES_DIR` does not name a directory.
    #[error("content types directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// One or more descriptor files failed to load.
    #[error("{} content type descriptor(s) in {dir} failed to load", failures.len())]
    InvalidDescriptors {
        dir: String,
        failures: Vec<(PathBuf, SchemaError)>,
    },

    /// Descriptor schema or registry error.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Bootstrap the application state from `config`.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let registry = ValidatorRegistry::standard();

    let content_types = match &config.content_types_dir {
        Some(dir) => load_content_types(dir, &registry)?,
        None => {
            tracing::warn!("CONTENT_TYPES_DIR not set; serving no content types");
            Vec::new()
        }
    };

    let content_types = ContentTypeRegistry::from_content_types(content_types)?;
    log_banner(&content_types);

    Ok(AppState::with_config(config, content_types))
}

// ---------------------------------------------------------------------------
// Phase 1: Load Descriptors
// ---------------------------------------------------------------------------

fn load_content_types(
    dir: &Path,
    registry: &ValidatorRegistry,
) -> Result<Vec<ContentType>, BootstrapError> {
    if !dir.is_dir() {
        return Err(BootstrapError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let validator = DescriptorValidator::new()?;
    let report = validator.load_dir(dir, registry)?;

    if !report.is_clean() {
        for (path, err) in &report.failures {
            tracing::error!(path = %path.display(), "content type descriptor rejected: {err}");
        }
        return Err(BootstrapError::InvalidDescriptors {
            dir: dir.display().to_string(),
            failures: report.failures,
        });
    }

    Ok(report.loaded)
}

// ---------------------------------------------------------------------------
// Phase 3: Log Banner
// ---------------------------------------------------------------------------

fn log_banner(content_types: &ContentTypeRegistry) {
    tracing::info!(count = content_types.len(), "content types registered");
    for ct in content_types.iter() {
        tracing::info!(
            uid = %ct.uid(),
            fields = ct.fields().len(),
            "serving content type"
        );
    }
}
