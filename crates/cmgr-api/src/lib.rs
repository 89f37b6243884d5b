//! # cmgr-api: Content-Manager HTTP Service
//!
//! Serves the content-manager explorer over Axum. Entries are stored in
//! memory, one store per content type; every write passes the field
//! coercion contract of `cmgr-schema` before it is stored.
//!
//! ## API Surface
//!
//! | Prefix                              | Module                      |
//! |-------------------------------------|-----------------------------|
//! | `/content-manager/explorer/*`       | [`routes::explorer`]        |
//! | `/content-manager/content-types/*`  | [`routes::content_types`]   |
//! | `/metrics`                          | [`middleware::metrics`]     |
//! | `/openapi.json`                     | [`openapi`]                 |
//! | `/health/*`                         | this module                 |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::middleware::from_fn;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the metrics and trace
/// layers so probe traffic does not show up in request counters.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::explorer::router())
        .merge(routes::content_types::router())
        .merge(middleware::metrics::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::trace::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: content types are compiled before the listener binds,
/// so a serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}
