//! Command-line interface of the catalog binary.
//!
//! `upload` mirrors the admin workflow end to end: transcode the given
//! photos, store them under the recipe's key prefix, build the record and
//! index patch, then save. Against a local root the save goes straight
//! through the catalog store; against a remote deployment images travel
//! via signed uploads and the save is a single `/save-recipe` call, so
//! the deployment's own store performs the index merge.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use common::{create_store, ObjectStore};

use catalog::builder::{build_records, RecipeForm};
use catalog::server::{CatalogServer, ServeArgs, ServerConfig, StoreArgs};
use catalog::upload::{SourceImage, UploadOrchestrator, UploadPlan};
use catalog::{CatalogStore, Error, IndexEntry, RecipeRecord, Result};

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Bilingual recipe catalog admin service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the admin HTTP server.
    Serve(ServeArgs),

    /// Transcode and upload a recipe's images, then save the record.
    Upload(UploadArgs),

    /// Delete a recipe, its index entry, and optionally its images.
    DeleteRecipe(DeleteRecipeArgs),

    /// Delete a single stored object by key.
    DeleteObject(DeleteObjectArgs),
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Recipe id, the root of its key namespace.
    #[arg(long)]
    pub id: String,

    /// Category the recipe lists under.
    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub title_ru: String,
    #[arg(long, default_value = "")]
    pub title_he: String,
    #[arg(long, default_value = "")]
    pub summary_ru: String,
    #[arg(long, default_value = "")]
    pub summary_he: String,

    #[arg(long)]
    pub price_amount: Option<f64>,
    #[arg(long)]
    pub price_currency: Option<String>,

    /// Comma-separated tag list.
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Thumbnail photo.
    #[arg(long)]
    pub thumb: Option<PathBuf>,

    /// Hero photos, in display order. Repeat the flag.
    #[arg(long = "hero")]
    pub hero: Vec<PathBuf>,

    /// Step photos, in step order. Repeat the flag.
    #[arg(long = "step")]
    pub steps: Vec<PathBuf>,

    /// Russian step captions, matched to step photos by position.
    #[arg(long = "caption-ru")]
    pub captions_ru: Vec<String>,

    /// Hebrew step captions, matched to step photos by position.
    #[arg(long = "caption-he")]
    pub captions_he: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DeleteRecipeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long)]
    pub id: String,

    /// Also remove everything under the recipe's image prefix.
    #[arg(long, default_value = "false")]
    pub delete_images: bool,
}

#[derive(Debug, Args)]
pub struct DeleteObjectArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long)]
    pub key: String,
}

/// Dispatch one parsed invocation.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Upload(args) => upload(args).await,
        Command::DeleteRecipe(args) => delete_recipe(args).await,
        Command::DeleteObject(args) => delete_object(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let store = create_store(&args.store.to_storage_config())?;
    let (worker, handle) = CatalogStore::new(store.clone());
    tokio::spawn(worker.run());

    CatalogServer::new(store, handle, ServerConfig::from(&args))
        .run()
        .await;
    Ok(())
}

async fn upload(args: UploadArgs) -> Result<()> {
    let store = create_store(&args.store.to_storage_config())?;

    let thumb = match &args.thumb {
        Some(path) => Some(read_source(path).await?),
        None => None,
    };
    let mut hero = Vec::with_capacity(args.hero.len());
    for path in &args.hero {
        hero.push(read_source(path).await?);
    }
    let mut steps = Vec::with_capacity(args.steps.len());
    for path in &args.steps {
        steps.push(read_source(path).await?);
    }

    let plan = UploadPlan {
        recipe_id: args.id.clone(),
        category: args.category.clone(),
        thumb,
        hero,
        steps,
        captions_ru: args.captions_ru.clone(),
        captions_he: args.captions_he.clone(),
    };

    let images = UploadOrchestrator::new(store.clone()).run(plan).await?;

    let form = RecipeForm {
        id: args.id,
        category: args.category,
        title_ru: args.title_ru,
        title_he: args.title_he,
        summary_ru: args.summary_ru,
        summary_he: args.summary_he,
        price_amount: args.price_amount,
        price_currency: args.price_currency,
        tags: args.tags,
        date: None,
    };
    let (record, patch) = build_records(&form, &images)?;
    let id = record.id.clone();

    match &args.store.remote {
        Some(endpoint) => {
            save_remote(endpoint, args.store.token.as_deref(), &record, &patch).await?
        }
        None => save_local(store, record, patch).await?,
    }

    println!("saved recipe {}", id);
    Ok(())
}

async fn delete_recipe(args: DeleteRecipeArgs) -> Result<()> {
    match &args.store.remote {
        Some(endpoint) => {
            invoke(
                endpoint,
                args.store.token.as_deref(),
                "/delete-recipe",
                &serde_json::json!({ "id": args.id, "deleteImages": args.delete_images }),
            )
            .await?;
        }
        None => {
            let store = create_store(&args.store.to_storage_config())?;
            let (worker, handle) = CatalogStore::new(store);
            let worker = tokio::spawn(worker.run());
            handle.delete(args.id.clone(), args.delete_images).await?;
            drop(handle);
            let _ = worker.await;
        }
    }

    println!("deleted recipe {}", args.id);
    Ok(())
}

async fn delete_object(args: DeleteObjectArgs) -> Result<()> {
    let store = create_store(&args.store.to_storage_config())?;
    store.delete(&args.key).await?;
    println!("deleted object {}", args.key);
    Ok(())
}

async fn save_local(
    store: Arc<dyn ObjectStore>,
    record: RecipeRecord,
    patch: IndexEntry,
) -> Result<()> {
    let (worker, handle) = CatalogStore::new(store);
    let worker = tokio::spawn(worker.run());
    handle.save(record, patch).await?;
    drop(handle);
    let _ = worker.await;
    Ok(())
}

async fn save_remote(
    endpoint: &str,
    token: Option<&str>,
    record: &RecipeRecord,
    patch: &IndexEntry,
) -> Result<()> {
    invoke(
        endpoint,
        token,
        "/save-recipe",
        &serde_json::json!({ "recipeJson": record, "indexPatch": patch }),
    )
    .await
}

/// One authenticated admin call against a remote deployment.
async fn invoke<T: Serialize + ?Sized>(endpoint: &str, token: Option<&str>, path: &str, body: &T) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| Error::Storage(format!("failed to build HTTP client: {}", e)))?;

    let url = format!("{}{}", endpoint.trim_end_matches('/'), path);
    let mut request = client.post(&url).json(body);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::Storage(format!("request to {} failed: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(Error::Storage(format!(
            "{} failed with status {}",
            path,
            response.status()
        )));
    }
    Ok(())
}

async fn read_source(path: &Path) -> Result<SourceImage> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Validation(format!("failed to read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(SourceImage {
        file_name,
        content: Bytes::from(content),
    })
}
