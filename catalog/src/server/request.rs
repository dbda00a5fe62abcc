//! Request types for the catalog server.

use serde::Deserialize;

use crate::model::{IndexEntry, RecipeRecord};

/// Body of `POST /upload-url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    pub key: String,

    /// Defaults to a guess from the key's extension when absent.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Body of `POST /save-recipe`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecipeRequest {
    pub recipe_json: RecipeRecord,
    pub index_patch: IndexEntry,
}

/// Body of `POST /delete-recipe`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecipeRequest {
    pub id: String,
    #[serde(default)]
    pub delete_images: bool,
}

/// Body of `POST /delete-object`.
#[derive(Debug, Deserialize)]
pub struct DeleteObjectRequest {
    pub key: String,
}

/// Body of `POST /delete-prefix`.
#[derive(Debug, Deserialize)]
pub struct DeletePrefixRequest {
    pub prefix: String,
}

/// Query of `POST /upload`.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub key: Option<String>,
}

/// Query of the signed transfer endpoint `PUT /object/{key}`.
#[derive(Debug, Deserialize)]
pub struct TransferParams {
    pub exp: i64,
    pub sig: String,
}

/// Guess a content type from a key's extension, the way the original
/// authorizer fell back when the client omitted one.
pub fn guess_content_type(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("webp") => "image/webp",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        Some("html") => "text/html",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
