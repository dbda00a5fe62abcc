//! Contact-form inbox.
//!
//! Submissions land as timestamped JSON under `data/contacts/`. The form
//! carries a hidden `website` field no human ever fills; a populated
//! value marks the submission as automated and it is dropped while still
//! reporting success, so the bot learns nothing. Email relay is handled
//! by an external mailer; this module only persists and logs.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use common::ObjectStore;

use crate::error::{Error, Result};
use crate::model::{to_pretty_json, JSON_CONTENT_TYPE};

/// One contact-form submission as posted by the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,

    /// Honeypot field; non-empty means automated.
    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub ua: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub page: String,
}

#[derive(Debug, Serialize)]
struct StoredSubmission<'a> {
    received_at: String,
    #[serde(flatten)]
    submission: &'a ContactSubmission,
}

/// Persists contact submissions through the object store.
#[derive(Clone)]
pub struct ContactInbox {
    store: Arc<dyn ObjectStore>,
}

impl ContactInbox {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Accept one submission.
    ///
    /// Honeypot hits return `Ok` without persisting anything. Real
    /// submissions need at least an email or a phone number.
    pub async fn submit(&self, submission: ContactSubmission) -> Result<()> {
        if !submission.website.trim().is_empty() {
            tracing::debug!(page = %submission.page, "honeypot tripped, dropping submission");
            return Ok(());
        }
        if submission.email.trim().is_empty() && submission.phone.trim().is_empty() {
            return Err(Error::Validation(
                "contact requires an email or a phone number".to_string(),
            ));
        }

        let now = Utc::now();
        let key = format!("data/contacts/{}.json", now.format("%Y%m%dT%H%M%S%3f"));
        let body = to_pretty_json(&StoredSubmission {
            received_at: now.to_rfc3339(),
            submission: &submission,
        })
        .map_err(|e| Error::Internal(format!("failed to encode submission: {}", e)))?;

        self.store.put(&key, body, JSON_CONTENT_TYPE).await?;
        tracing::info!(key = %key, lang = %submission.lang, "stored contact submission; relay is left to the mailer");
        Ok(())
    }
}
