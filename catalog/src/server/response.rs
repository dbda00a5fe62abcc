//! Response types for the catalog server.

use serde::Serialize;

/// Response of `POST /upload-url`: where and how to transfer the bytes.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub url: String,
    pub method: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Acknowledgement carrying the affected recipe id.
#[derive(Debug, Serialize)]
pub struct OkIdResponse {
    pub ok: bool,
    pub id: String,
}

impl OkIdResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: id.into(),
        }
    }
}

/// Acknowledgement carrying the affected object key.
#[derive(Debug, Serialize)]
pub struct OkKeyResponse {
    pub ok: bool,
    pub key: String,
}

impl OkKeyResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            ok: true,
            key: key.into(),
        }
    }
}
