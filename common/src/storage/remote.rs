//! Remote backend speaking the signed-URL upload protocol.
//!
//! Writes are two independent network calls: request a short-lived write
//! authorization for the key and content type, then transfer the bytes to
//! the returned URL with the returned method. The transfer must reuse the
//! content type supplied at authorization time or the target rejects it.
//! Deletes go to the admin endpoints of the same service.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::config::RemoteStoreConfig;
use super::key::safe_key;
use super::{ObjectStore, StorageError, StorageResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlRequest<'a> {
    key: &'a str,
    content_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadAuthorization {
    url: String,
    #[serde(default = "default_method")]
    method: String,
}

fn default_method() -> String {
    "PUT".to_string()
}

/// Object store that persists through a remote authorization service.
pub struct RemoteStore {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl RemoteStore {
    /// Build a store from configuration. Every request carries the
    /// configured timeout; a timeout surfaces as [`StorageError::Remote`].
    pub fn new(config: &RemoteStoreConfig) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Remote(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> StorageResult<reqwest::Response> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| remote_err(&url, e))?;
        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "{} failed with status {}",
                path,
                response.status()
            )));
        }
        Ok(response)
    }
}

fn remote_err(url: &str, err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Remote(format!("request to {} timed out", url))
    } else {
        StorageError::Remote(format!("request to {} failed: {}", url, err))
    }
}

#[async_trait]
impl ObjectStore for RemoteStore {
    async fn put(&self, key: &str, content: Bytes, content_type: &str) -> StorageResult<()> {
        let key = safe_key(key)?;

        let authorization: UploadAuthorization = self
            .post_json(
                "/upload-url",
                &UploadUrlRequest {
                    key: &key,
                    content_type,
                },
            )
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Remote(format!("bad upload-url response: {}", e)))?;

        let method = reqwest::Method::from_bytes(authorization.method.as_bytes())
            .map_err(|_| {
                StorageError::Remote(format!(
                    "authorization returned unsupported method {:?}",
                    authorization.method
                ))
            })?;

        // The transfer must carry the content type the authorization was
        // issued for; the target verifies it against the signature.
        let response = self
            .client
            .request(method, &authorization.url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await
            .map_err(|e| remote_err(&authorization.url, e))?;
        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "transfer of {} rejected with status {}",
                key,
                response.status()
            )));
        }
        tracing::debug!(key = %key, "transferred object to remote target");
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let key = safe_key(key)?;
        let url = format!("{}/{}", self.endpoint, key);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| remote_err(&url, e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "fetch of {} failed with status {}",
                key,
                response.status()
            )));
        }
        let content = response
            .bytes()
            .await
            .map_err(|e| remote_err(&url, e))?;
        Ok(Some(content))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let key = safe_key(key)?;
        self.post_json("/delete-object", &serde_json::json!({ "key": key }))
            .await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<()> {
        let prefix = safe_key(prefix.trim_end_matches('/'))?;
        self.post_json(
            "/delete-prefix",
            &serde_json::json!({ "prefix": format!("{}/", prefix) }),
        )
        .await?;
        Ok(())
    }
}
