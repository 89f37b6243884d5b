//! # Prometheus Metrics
//!
//! Request metrics through the `metrics` facade. The binary installs a
//! `metrics-exporter-prometheus` recorder and hands its handle to
//! [`AppState`]; without a recorder the counters are no-ops and
//! `/metrics` answers 404.
//!
//! | Counter                        | Labels              |
//! |--------------------------------|---------------------|
//! | `cmgr_http_requests_total`     | `method`, `status`  |
//! | `cmgr_http_errors_total`       | `method`, `status`  |
//! | `cmgr_field_rejections_total`  | `code`              |

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub const REQUESTS_TOTAL: &str = "cmgr_http_requests_total";
pub const ERRORS_TOTAL: &str = "cmgr_http_errors_total";

/// Status class label, e.g. `2xx`.
fn status_class(status: StatusCode) -> String {
    format!("{}xx", status.as_u16() / 100)
}

/// Middleware that counts requests and 4xx/5xx responses.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let class = status_class(status);
    if status.is_client_error() || status.is_server_error() {
        metrics::counter!(ERRORS_TOTAL, "method" => method.clone(), "status" => class.clone())
            .increment(1);
    }
    metrics::counter!(REQUESTS_TOTAL, "method" => method, "status" => class).increment(1);

    response
}

/// Build the `/metrics` router.
pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(render))
}

/// GET /metrics: Prometheus text exposition.
async fn render(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound("metrics recorder not installed".to_string()))
}
