//! Bilingual recipe catalog.
//!
//! The catalog persists recipe records as per-id JSON files plus one
//! denormalized index collection used by listing views, and stores the
//! recipes' transcoded images next to them. All persistence goes through
//! the [`common::ObjectStore`] abstraction, so the same code runs against
//! a local directory tree or a remote signed-URL object host.
//!
//! Modules, leaf-first:
//!
//! - [`transcode`]: raster image → size-capped lossy WebP.
//! - [`upload`]: orchestrates transcode + store for the fixed image roles
//!   of a recipe (thumbnail, hero shots, step shots).
//! - [`builder`]: assembles a [`model::RecipeRecord`] and its
//!   [`model::IndexEntry`] patch from form input and uploaded keys.
//! - [`store`]: the single-writer catalog store (record writes, index
//!   merge, deletion).
//! - [`contact`]: contact-form inbox with honeypot filtering.
//! - [`server`]: the admin HTTP API.

pub mod builder;
pub mod contact;
pub mod error;
pub mod model;
pub mod server;
pub mod store;
pub mod transcode;
pub mod upload;

pub use builder::{build_records, RecipeForm};
pub use error::{Error, Result};
pub use model::{HeroImages, IndexEntry, Localized, Price, RecipeRecord, StepImage};
pub use store::{CatalogStore, CatalogStoreHandle};
pub use upload::{SourceImage, UploadOrchestrator, UploadPlan, UploadedImages};
