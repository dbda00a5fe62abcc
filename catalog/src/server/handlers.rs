//! HTTP route handlers for the catalog server.
//!
//! Admin actions (uploads, saves, deletions) mutate through the shared
//! [`CatalogStoreHandle`] and [`ObjectStore`]; reads back the listing and
//! detail views of the site. Validation failures map to 4xx, storage and
//! internal failures to 5xx, all with a minimal JSON error body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use common::storage::key::safe_key;
use common::ObjectStore;

use super::error::{forbidden, not_found, ApiError};
use super::metrics::Metrics;
use super::request::{
    guess_content_type, DeleteObjectRequest, DeletePrefixRequest, DeleteRecipeRequest,
    SaveRecipeRequest, TransferParams, UploadParams, UploadUrlRequest,
};
use super::response::{OkIdResponse, OkKeyResponse, OkResponse, UploadUrlResponse};
use super::sign::{SignatureError, UrlSigner, AUTHORIZATION_TTL_SECS};
use crate::contact::{ContactInbox, ContactSubmission};
use crate::error::Error;
use crate::store::CatalogStoreHandle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStoreHandle,
    pub store: Arc<dyn ObjectStore>,
    pub contact: ContactInbox,
    pub signer: UrlSigner,
    pub metrics: Arc<Metrics>,

    /// Base URL signed upload URLs point at, no trailing slash.
    pub public_url: Arc<str>,
}

/// Handle `POST /upload-url`.
///
/// Issues a short-lived signed authorization for one PUT of the given
/// content type to the given key. The transfer itself goes to
/// [`handle_transfer`].
pub async fn handle_upload_url(
    State(state): State<AppState>,
    Json(request): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    let key = safe_key(&request.key).map_err(Error::from)?;
    let content_type = request
        .content_type
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| guess_content_type(&key).to_string());

    let expires_at = Utc::now().timestamp() + AUTHORIZATION_TTL_SECS;
    let signature = state.signer.sign(&key, &content_type, expires_at);
    let url = format!(
        "{}/object/{}?exp={}&sig={}",
        state.public_url, key, expires_at, signature
    );

    state.metrics.upload_urls_issued_total.inc();
    tracing::debug!(key = %key, content_type = %content_type, "issued upload authorization");

    Ok(Json(UploadUrlResponse {
        url,
        method: "PUT".to_string(),
    }))
}

/// Handle `PUT /object/{key}`, the signed transfer target.
///
/// The request must present the exact key, expiry and content type the
/// authorization was issued for; anything else is rejected with 403.
pub async fn handle_transfer(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<TransferParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let key = safe_key(&key).map_err(Error::from)?;

    let content_type = match headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(ct) => ct.to_string(),
        None => return Ok(forbidden("content type is required")),
    };

    let now = Utc::now().timestamp();
    if let Err(err) = state
        .signer
        .verify(&key, &content_type, params.exp, &params.sig, now)
    {
        tracing::debug!(key = %key, error = %err, "rejected transfer");
        return Ok(match err {
            SignatureError::Expired => forbidden("authorization expired"),
            SignatureError::Invalid => forbidden("signature mismatch"),
        });
    }

    state.store.put(&key, body, &content_type).await.map_err(Error::from)?;
    state.metrics.objects_stored_total.inc();
    Ok(Json(OkKeyResponse::new(key)).into_response())
}

/// Handle `POST /upload?key=<key>`: direct multipart write.
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<OkKeyResponse>, ApiError> {
    let key = params.key.ok_or("upload key is required")?;
    let key = safe_key(&key).map_err(Error::from)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(&key).to_string());
        let content = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("invalid multipart body: {}", e)))?;

        state
            .store
            .put(&key, content, &content_type)
            .await
            .map_err(Error::from)?;
        state.metrics.objects_stored_total.inc();
        return Ok(Json(OkKeyResponse::new(key)));
    }

    Err(ApiError::from("multipart field `file` is required"))
}

/// Handle `POST /save-recipe`.
pub async fn handle_save_recipe(
    State(state): State<AppState>,
    Json(request): Json<SaveRecipeRequest>,
) -> Result<Json<OkIdResponse>, ApiError> {
    let record = request.recipe_json;
    let patch = request.index_patch;

    if record.id.trim().is_empty() {
        return Err(ApiError::from("missing id"));
    }
    if record.category.trim().is_empty() {
        return Err(ApiError::from("missing category"));
    }
    if patch.id != record.id {
        return Err(ApiError::from("index patch id does not match record id"));
    }

    let id = record.id.clone();
    state.catalog.save(record, patch).await?;
    state.metrics.recipes_saved_total.inc();
    Ok(Json(OkIdResponse::new(id)))
}

/// Handle `POST /delete-recipe`. Deleting an absent id is success.
pub async fn handle_delete_recipe(
    State(state): State<AppState>,
    Json(request): Json<DeleteRecipeRequest>,
) -> Result<Json<OkIdResponse>, ApiError> {
    if request.id.trim().is_empty() {
        return Err(ApiError::from("missing id"));
    }

    state
        .catalog
        .delete(request.id.clone(), request.delete_images)
        .await?;
    state.metrics.recipes_deleted_total.inc();
    Ok(Json(OkIdResponse::new(request.id)))
}

/// Handle `POST /delete-object`.
pub async fn handle_delete_object(
    State(state): State<AppState>,
    Json(request): Json<DeleteObjectRequest>,
) -> Result<Json<OkKeyResponse>, ApiError> {
    let key = safe_key(&request.key).map_err(Error::from)?;
    state.store.delete(&key).await.map_err(Error::from)?;
    Ok(Json(OkKeyResponse::new(key)))
}

/// Handle `POST /delete-prefix`: whole-subtree cleanup for remote
/// backends.
pub async fn handle_delete_prefix(
    State(state): State<AppState>,
    Json(request): Json<DeletePrefixRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    safe_key(request.prefix.trim_end_matches('/')).map_err(Error::from)?;
    state
        .store
        .delete_prefix(&request.prefix)
        .await
        .map_err(Error::from)?;
    Ok(Json(OkResponse::new()))
}

/// Handle `POST /contact`.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<OkResponse>, ApiError> {
    state.contact.submit(submission).await?;
    state.metrics.contact_submissions_total.inc();
    Ok(Json(OkResponse::new()))
}

/// Handle `GET /recipes/{id}`, backing the detail view.
pub async fn handle_get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.catalog.load(id.clone()).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(not_found(&format!("recipe {} not found", id))),
    }
}

/// Handle `GET /recipes`: the index collection in stored order.
pub async fn handle_get_index(
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let index = state.catalog.index().await?;
    Ok(Json(index).into_response())
}

/// Handle `GET /metrics`.
pub async fn handle_metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        state.metrics.encode(),
    )
        .into_response()
}
