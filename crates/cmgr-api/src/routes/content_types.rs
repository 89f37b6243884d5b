//! # Content-Type Listing
//!
//! Read-only view of the content types compiled at startup.
//!
//! - `GET /content-manager/content-types`: all content types
//! - `GET /content-manager/content-types/:uid`: one content type

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use cmgr_core::FieldDeclaration;
use cmgr_schema::ContentType;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// A content type and its field declarations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContentTypeInfo {
    /// Content-type uid, e.g. `application::withboolean.withboolean`.
    pub uid: String,
    pub name: String,
    /// Field declarations keyed by field name.
    #[schema(value_type = Object)]
    pub attributes: BTreeMap<String, FieldDeclaration>,
}

impl From<&ContentType> for ContentTypeInfo {
    fn from(ct: &ContentType) -> Self {
        Self {
            uid: ct.uid().to_string(),
            name: ct.name().to_string(),
            attributes: ct
                .declarations()
                .map(|decl| (decl.name().to_string(), decl.clone()))
                .collect(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content-manager/content-types", get(list_content_types))
        .route("/content-manager/content-types/:uid", get(get_content_type))
}

/// GET /content-manager/content-types: List registered content types.
#[utoipa::path(
    get,
    path = "/content-manager/content-types",
    responses(
        (status = 200, description = "Registered content types", body = Vec<ContentTypeInfo>),
    ),
    tag = "content-types"
)]
pub(crate) async fn list_content_types(State(state): State<AppState>) -> Json<Vec<ContentTypeInfo>> {
    Json(
        state
            .content_types
            .iter()
            .map(|ct| ContentTypeInfo::from(ct.as_ref()))
            .collect(),
    )
}

/// GET /content-manager/content-types/:uid: Get one content type.
#[utoipa::path(
    get,
    path = "/content-manager/content-types/{uid}",
    params(("uid" = String, Path, description = "Content-type uid")),
    responses(
        (status = 200, description = "Content type found", body = ContentTypeInfo),
        (status = 404, description = "Unknown content type", body = crate::error::ErrorBody),
    ),
    tag = "content-types"
)]
pub(crate) async fn get_content_type(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ContentTypeInfo>, AppError> {
    state
        .content_types
        .get(&uid)
        .map(|ct| Json(ContentTypeInfo::from(ct.as_ref())))
        .ok_or_else(|| AppError::NotFound(format!("content type {uid} not found")))
}
