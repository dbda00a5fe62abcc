//! The catalog store: record persistence, index merge, deletion.
//!
//! The index collection is a single shared file, so concurrent
//! read-modify-write cycles would race and drop updates. All mutations
//! are therefore serialized behind one worker task: [`CatalogStore::run`]
//! owns the object store and processes commands one at a time, and
//! [`CatalogStoreHandle`] is the cloneable front end the server and CLI
//! talk to.
//!
//! Saving is two sequential writes (the record file, then the merged
//! index) with no transaction log. A failure between them leaves the two
//! stores inconsistent until the next successful save of the same id;
//! the worker logs the orphaned id so an operator can re-save.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use common::ObjectStore;

use crate::error::{Error, Result};
use crate::model::{to_pretty_json, IndexEntry, RecipeRecord, JSON_CONTENT_TYPE};

/// Key of the shared index collection.
pub const INDEX_KEY: &str = "data/recipes/index.json";

const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Key of the full record for `id`.
pub fn record_key(id: &str) -> String {
    format!("data/recipes/{}.json", id)
}

/// Key prefix of every stored image of `id`.
pub fn image_prefix(id: &str) -> String {
    format!("images/recipes/{}/", id)
}

enum Command {
    Save {
        record: Box<RecipeRecord>,
        patch: Box<IndexEntry>,
        reply: oneshot::Sender<Result<()>>,
    },
    Delete {
        id: String,
        delete_images: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    Load {
        id: String,
        reply: oneshot::Sender<Result<Option<RecipeRecord>>>,
    },
    Index {
        reply: oneshot::Sender<Result<Vec<IndexEntry>>>,
    },
}

/// Worker owning all catalog reads and writes.
pub struct CatalogStore {
    store: Arc<dyn ObjectStore>,
    rx: mpsc::Receiver<Command>,
}

/// Cloneable handle for submitting catalog operations to the worker.
#[derive(Clone)]
pub struct CatalogStoreHandle {
    tx: mpsc::Sender<Command>,
}

impl CatalogStore {
    /// Create the worker and its handle. Spawn the worker with
    /// `tokio::spawn(store.run())`; it exits when every handle is gone.
    pub fn new(store: Arc<dyn ObjectStore>) -> (Self, CatalogStoreHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        (Self { store, rx }, CatalogStoreHandle { tx })
    }

    /// Run the command loop.
    pub async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Save { record, patch, reply } => {
                    let _ = reply.send(self.save(*record, *patch).await);
                }
                Command::Delete {
                    id,
                    delete_images,
                    reply,
                } => {
                    let _ = reply.send(self.delete(&id, delete_images).await);
                }
                Command::Load { id, reply } => {
                    let _ = reply.send(self.load(&id).await);
                }
                Command::Index { reply } => {
                    let _ = reply.send(self.read_index().await);
                }
            }
        }
        tracing::debug!("catalog store worker stopped");
    }

    async fn save(&self, record: RecipeRecord, patch: IndexEntry) -> Result<()> {
        let body = to_pretty_json(&record)
            .map_err(|e| Error::Internal(format!("failed to encode record: {}", e)))?;
        self.store
            .put(&record_key(&record.id), body, JSON_CONTENT_TYPE)
            .await?;

        match self.merge_index(&patch).await {
            Ok(()) => {
                tracing::info!(id = %record.id, "saved recipe");
                Ok(())
            }
            Err(err) => {
                // The record write already succeeded; the index no longer
                // reflects it until the next successful save of this id.
                tracing::warn!(
                    id = %record.id,
                    error = %err,
                    "index merge failed after record write; record is orphaned until re-saved"
                );
                Err(err)
            }
        }
    }

    /// Replace the entry with a matching id in place, preserving its
    /// position; append when absent. Idempotent under retry with the same
    /// patch.
    async fn merge_index(&self, patch: &IndexEntry) -> Result<()> {
        let mut index = self.read_index().await?;
        match index.iter_mut().find(|entry| entry.id == patch.id) {
            Some(entry) => *entry = patch.clone(),
            None => index.push(patch.clone()),
        }
        self.write_index(&index).await
    }

    async fn delete(&self, id: &str, delete_images: bool) -> Result<()> {
        if id.trim().is_empty() {
            return Err(Error::Validation("recipe id is required".to_string()));
        }

        // Absent record file is success: deletion is idempotent.
        self.store.delete(&record_key(id)).await?;

        let mut index = self.read_index().await?;
        let before = index.len();
        index.retain(|entry| entry.id != id);
        if index.len() != before {
            self.write_index(&index).await?;
        }

        if delete_images {
            self.store.delete_prefix(&image_prefix(id)).await?;
        }

        tracing::info!(id = %id, delete_images, "deleted recipe");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<RecipeRecord>> {
        let content = match self.store.get(&record_key(id)).await? {
            Some(content) => content,
            None => return Ok(None),
        };
        let record = serde_json::from_slice(&content)
            .map_err(|e| Error::Internal(format!("failed to decode record {}: {}", id, e)))?;
        Ok(Some(record))
    }

    async fn read_index(&self) -> Result<Vec<IndexEntry>> {
        let content = match self.store.get(INDEX_KEY).await? {
            Some(content) => content,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_slice(&content) {
            Ok(index) => Ok(index),
            Err(err) => {
                // An unreadable index starts empty rather than wedging
                // every listing and save.
                tracing::warn!(error = %err, "index collection is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_index(&self, index: &[IndexEntry]) -> Result<()> {
        let body = to_pretty_json(&index)
            .map_err(|e| Error::Internal(format!("failed to encode index: {}", e)))?;
        self.store.put(INDEX_KEY, body, JSON_CONTENT_TYPE).await?;
        Ok(())
    }
}

impl CatalogStoreHandle {
    /// Persist the full record and merge its patch into the index.
    pub async fn save(&self, record: RecipeRecord, patch: IndexEntry) -> Result<()> {
        self.send(|reply| Command::Save {
            record: Box::new(record),
            patch: Box::new(patch),
            reply,
        })
        .await
    }

    /// Remove a record, its index entry, and optionally its images.
    /// Deleting an id that does not exist is success.
    pub async fn delete(&self, id: impl Into<String>, delete_images: bool) -> Result<()> {
        let id = id.into();
        self.send(|reply| Command::Delete {
            id,
            delete_images,
            reply,
        })
        .await
    }

    /// Fetch one full record.
    pub async fn load(&self, id: impl Into<String>) -> Result<Option<RecipeRecord>> {
        let id = id.into();
        self.send(|reply| Command::Load { id, reply }).await
    }

    /// Current index collection in stored order.
    pub async fn index(&self) -> Result<Vec<IndexEntry>> {
        self.send(|reply| Command::Index { reply }).await
    }

    async fn send<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| Error::Internal("catalog store is not running".to_string()))?;
        reply_rx
            .await
            .map_err(|_| Error::Internal("catalog store dropped the request".to_string()))?
    }
}
