//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec.
//! Serves at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content Manager API",
        version = "0.1.0",
        description = "Content-manager explorer: create, update and read entries whose fields are coerced and validated per field type (boolean, enumeration, string, text, richtext).",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Explorer
        crate::routes::explorer::create_entry,
        crate::routes::explorer::list_entries,
        crate::routes::explorer::count_entries,
        crate::routes::explorer::get_entry,
        crate::routes::explorer::update_entry,
        crate::routes::explorer::delete_entry,
        // Content types
        crate::routes::content_types::list_content_types,
        crate::routes::content_types::get_content_type,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::error::FieldViolation,
        // DTOs
        crate::routes::explorer::CountResponse,
        crate::routes::content_types::ContentTypeInfo,
    )),
    tags(
        (name = "explorer", description = "Content-manager explorer"),
        (name = "content-types", description = "Registered content types"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
