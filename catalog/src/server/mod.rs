//! HTTP server for the catalog admin API.
//!
//! This module exposes the upload, save, delete and contact operations as
//! REST endpoints, plus the signed-URL transfer target that remote
//! uploads PUT their bytes to.

mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
mod middleware;
mod request;
mod response;
mod sign;

pub use config::{ServeArgs, ServerConfig, StoreArgs};
pub use http::{router, CatalogServer};
pub use sign::UrlSigner;
