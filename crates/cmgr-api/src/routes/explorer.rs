//! # Content-Manager Explorer API
//!
//! Create, update and read entries of a content type. Every write goes
//! through `cmgr_schema::validate_write`, so each declared field is coerced
//! by its validator and the write is stored only if all fields are accepted.
//!
//! ## Endpoints
//!
//! - `POST /content-manager/explorer/:uid`: create entry
//! - `GET /content-manager/explorer/:uid`: list entries (`_start`, `_limit`)
//! - `GET /content-manager/explorer/:uid/count`: count entries
//! - `GET /content-manager/explorer/:uid/:id`: get entry
//! - `PUT /content-manager/explorer/:uid/:id`: update entry
//! - `DELETE /content-manager/explorer/:uid/:id`: delete entry

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, Request, State};
use axum::routing::get;
use axum::{Json, Router};
use cmgr_schema::{validate_write, ContentType, FieldValues, WriteMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::read_payload;
use crate::state::AppState;
use crate::store::Entry;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Pagination of the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of entries to skip.
    #[serde(rename = "_start")]
    pub start: Option<usize>,
    /// Maximum number of entries to return; negative means no limit.
    #[serde(rename = "_limit")]
    pub limit: Option<i64>,
}

impl ListParams {
    fn limit(&self) -> Option<usize> {
        self.limit.and_then(|limit| usize::try_from(limit).ok())
    }
}

/// Response of the count endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: usize,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the explorer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/content-manager/explorer/:uid",
            get(list_entries).post(create_entry),
        )
        .route("/content-manager/explorer/:uid/count", get(count_entries))
        .route(
            "/content-manager/explorer/:uid/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /content-manager/explorer/:uid: Create an entry.
#[utoipa::path(
    post,
    path = "/content-manager/explorer/{uid}",
    params(("uid" = String, Path, description = "Content-type uid")),
    request_body(content = serde_json::Value, description = "Field values as JSON, or a `data` form field holding the same JSON"),
    responses(
        (status = 200, description = "Entry created", body = serde_json::Value),
        (status = 400, description = "Field rejected or body malformed", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown content type", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn create_entry(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    request: Request,
) -> Result<Json<Entry>, AppError> {
    let (content_type, store) = state.resolve(&uid)?;
    let payload = read_payload(request).await?;
    let fields = validate(&uid, &content_type, &payload, WriteMode::Create)?;

    let entry = store.create(fields);
    tracing::info!(uid = %uid, id = entry.id, "entry created");
    Ok(Json(entry))
}

/// GET /content-manager/explorer/:uid: List entries in id order.
#[utoipa::path(
    get,
    path = "/content-manager/explorer/{uid}",
    params(("uid" = String, Path, description = "Content-type uid"), ListParams),
    responses(
        (status = 200, description = "Entries", body = Vec<serde_json::Value>),
        (status = 404, description = "Unknown content type", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn list_entries(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let Query(params) = params.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let (_, store) = state.resolve(&uid)?;
    Ok(Json(store.list(params.start.unwrap_or(0), params.limit())))
}

/// GET /content-manager/explorer/:uid/count: Count entries.
#[utoipa::path(
    get,
    path = "/content-manager/explorer/{uid}/count",
    params(("uid" = String, Path, description = "Content-type uid")),
    responses(
        (status = 200, description = "Entry count", body = CountResponse),
        (status = 404, description = "Unknown content type", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn count_entries(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<CountResponse>, AppError> {
    let (_, store) = state.resolve(&uid)?;
    Ok(Json(CountResponse { count: store.len() }))
}

/// GET /content-manager/explorer/:uid/:id: Get one entry.
#[utoipa::path(
    get,
    path = "/content-manager/explorer/{uid}/{id}",
    params(
        ("uid" = String, Path, description = "Content-type uid"),
        ("id" = u64, Path, description = "Entry id"),
    ),
    responses(
        (status = 200, description = "Entry found", body = serde_json::Value),
        (status = 404, description = "Unknown content type or entry", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn get_entry(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
) -> Result<Json<Entry>, AppError> {
    let (_, store) = state.resolve(&uid)?;
    let id = parse_id(&uid, &id)?;
    store
        .get(id)
        .map(Json)
        .ok_or_else(|| entry_not_found(&uid, id))
}

/// PUT /content-manager/explorer/:uid/:id: Update an entry.
///
/// Only fields present in the payload change; the id is kept.
#[utoipa::path(
    put,
    path = "/content-manager/explorer/{uid}/{id}",
    params(
        ("uid" = String, Path, description = "Content-type uid"),
        ("id" = u64, Path, description = "Entry id"),
    ),
    request_body(content = serde_json::Value, description = "Field values as JSON, or a `data` form field holding the same JSON"),
    responses(
        (status = 200, description = "Entry updated", body = serde_json::Value),
        (status = 400, description = "Field rejected or body malformed", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown content type or entry", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn update_entry(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
    request: Request,
) -> Result<Json<Entry>, AppError> {
    let (content_type, store) = state.resolve(&uid)?;
    let id = parse_id(&uid, &id)?;
    if store.get(id).is_none() {
        return Err(entry_not_found(&uid, id));
    }

    let payload = read_payload(request).await?;
    let fields = validate(&uid, &content_type, &payload, WriteMode::Update)?;

    // Removed between the existence check and the write.
    let entry = store
        .update(id, fields)
        .ok_or_else(|| entry_not_found(&uid, id))?;
    tracing::info!(uid = %uid, id, "entry updated");
    Ok(Json(entry))
}

/// DELETE /content-manager/explorer/:uid/:id: Delete an entry.
#[utoipa::path(
    delete,
    path = "/content-manager/explorer/{uid}/{id}",
    params(
        ("uid" = String, Path, description = "Content-type uid"),
        ("id" = u64, Path, description = "Entry id"),
    ),
    responses(
        (status = 200, description = "Removed entry", body = serde_json::Value),
        (status = 404, description = "Unknown content type or entry", body = crate::error::ErrorBody),
    ),
    tag = "explorer"
)]
pub(crate) async fn delete_entry(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
) -> Result<Json<Entry>, AppError> {
    let (_, store) = state.resolve(&uid)?;
    let id = parse_id(&uid, &id)?;
    let entry = store.remove(id).ok_or_else(|| entry_not_found(&uid, id))?;
    tracing::info!(uid = %uid, id, "entry deleted");
    Ok(Json(entry))
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Run the write dispatch and count each rejected field.
fn validate(
    uid: &str,
    content_type: &ContentType,
    payload: &Value,
    mode: WriteMode,
) -> Result<FieldValues, AppError> {
    validate_write(content_type, payload, mode).map_err(|err| {
        for rejection in err.rejections() {
            tracing::debug!(
                uid = %uid,
                field = %rejection.field,
                reason = %rejection.reason,
                "field rejected"
            );
            metrics::counter!(
                "cmgr_field_rejections_total",
                "code" => rejection.reason.code()
            )
            .increment(1);
        }
        AppError::from(err)
    })
}

/// Ids that are not numbers cannot name an entry.
fn parse_id(uid: &str, raw: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("entry {raw} of {uid} not found")))
}

fn entry_not_found(uid: &str, id: u64) -> AppError {
    AppError::NotFound(format!("entry {id} of {uid} not found"))
}
