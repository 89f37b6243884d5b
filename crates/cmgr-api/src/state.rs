//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! ## Architecture
//!
//! - **Content types**: the immutable [`ContentTypeRegistry`] compiled at
//!   startup. Handlers resolve a uid to an `Arc<ContentType>` and apply its
//!   validators; nothing in the request path mutates it.
//! - **Entries**: one in-memory [`EntryStore`] per content type.
//! - **Metrics**: optional Prometheus handle, installed by the binary.

use std::path::PathBuf;
use std::sync::Arc;

use cmgr_schema::{ContentType, ContentTypeRegistry};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::error::AppError;
use crate::store::{EntryRepository, EntryStore};

/// Default listening port.
const DEFAULT_PORT: u16 = 8080;

// -- Configuration ------------------------------------------------------------

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything other than `json` is pretty.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory of content-type descriptors loaded at startup.
    pub content_types_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Build configuration from `PORT`, `CONTENT_TYPES_DIR` and `LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let content_types_dir = lookup("CONTENT_TYPES_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        let log_format = lookup("LOG_FORMAT")
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();
        Self {
            port,
            content_types_dir,
            log_format,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            content_types_dir: None,
            log_format: LogFormat::Pretty,
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub content_types: Arc<ContentTypeRegistry>,
    pub entries: Arc<EntryRepository>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with default configuration serving `content_types`.
    pub fn new(content_types: ContentTypeRegistry) -> Self {
        Self::with_config(AppConfig::default(), content_types)
    }

    /// State with explicit configuration. Creates an empty entry store for
    /// every registered content type.
    pub fn with_config(config: AppConfig, content_types: ContentTypeRegistry) -> Self {
        let entries = EntryRepository::for_registry(&content_types);
        Self {
            config,
            content_types: Arc::new(content_types),
            entries: Arc::new(entries),
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Resolve a content-type uid to its compiled definition and store.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown uid; [`AppError::Internal`] if
    /// the uid is registered but has no store.
    pub fn resolve(&self, uid: &str) -> Result<(Arc<ContentType>, &EntryStore), AppError> {
        let content_type = self
            .content_types
            .get(uid)
            .ok_or_else(|| AppError::NotFound(format!("content type {uid} not found")))?;
        let store = self
            .entries
            .store(uid)
            .ok_or_else(|| AppError::Internal(format!("no entry store for content type {uid}")))?;
        Ok((content_type, store))
    }
}
