use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog record. Opaque to the coordination engine beyond pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub product_type: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of search results, replaced wholesale on every accepted response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "products")]
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Payload of `GET /suggest`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestPayload {
    pub suggestions: Vec<String>,
}

/// Timing info the service attaches to responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Performance {
    pub duration: String,
    pub cached: Option<bool>,
}

/// The service wraps every response body in this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub performance: Option<Performance>,
}

/// A file selected for bulk upload: raw bytes plus the original name.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Outcome of a completed CSV upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// Server-provided summary, e.g. "12000 rows indexed".
    pub message: Option<String>,
}
