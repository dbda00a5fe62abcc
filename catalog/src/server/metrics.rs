//! Prometheus metrics for the catalog server.

use axum::http::Method;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Labels for HTTP request metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabelsWithStatus {
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: u16,
}

/// HTTP method label value.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl From<&Method> for HttpMethod {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => HttpMethod::Get,
            Method::POST => HttpMethod::Post,
            Method::PUT => HttpMethod::Put,
            Method::DELETE => HttpMethod::Delete,
            _ => HttpMethod::Other,
        }
    }
}

/// Container for all Prometheus metrics.
pub struct Metrics {
    registry: Registry,

    /// Counter of objects written through upload endpoints.
    pub objects_stored_total: Counter,

    /// Counter of upload authorizations issued.
    pub upload_urls_issued_total: Counter,

    /// Counter of recipes saved.
    pub recipes_saved_total: Counter,

    /// Counter of recipes deleted.
    pub recipes_deleted_total: Counter,

    /// Counter of contact submissions accepted.
    pub contact_submissions_total: Counter,

    /// Counter of HTTP requests.
    pub http_requests_total: Family<HttpLabelsWithStatus, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let objects_stored_total = Counter::default();
        registry.register(
            "catalog_objects_stored_total",
            "Total number of objects written through upload endpoints",
            objects_stored_total.clone(),
        );

        let upload_urls_issued_total = Counter::default();
        registry.register(
            "catalog_upload_urls_issued_total",
            "Total number of upload authorizations issued",
            upload_urls_issued_total.clone(),
        );

        let recipes_saved_total = Counter::default();
        registry.register(
            "catalog_recipes_saved_total",
            "Total number of recipes saved",
            recipes_saved_total.clone(),
        );

        let recipes_deleted_total = Counter::default();
        registry.register(
            "catalog_recipes_deleted_total",
            "Total number of recipes deleted",
            recipes_deleted_total.clone(),
        );

        let contact_submissions_total = Counter::default();
        registry.register(
            "catalog_contact_submissions_total",
            "Total number of contact submissions accepted",
            contact_submissions_total.clone(),
        );

        let http_requests_total = Family::<HttpLabelsWithStatus, Counter>::default();
        registry.register(
            "http_requests_total",
            "Total number of HTTP requests",
            http_requests_total.clone(),
        );

        Self {
            registry,
            objects_stored_total,
            upload_urls_issued_total,
            recipes_saved_total,
            recipes_deleted_total,
            contact_submissions_total,
            http_requests_total,
        }
    }

    /// Encode all metrics to Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, &self.registry)
            .expect("encoding metrics should not fail");
        buffer
    }
}
