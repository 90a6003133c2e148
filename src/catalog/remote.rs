use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::schema::{ApiEnvelope, SearchPage, SuggestPayload, UploadFile, UploadReceipt};
use super::timeout::request_timeout;

/// Failure taxonomy for catalog calls.
///
/// `Transport` means the server never answered (connection refused, DNS,
/// dropped socket); `Application` means it answered with an error payload.
/// The distinction matters for uploads: a dropped connection does not imply
/// the server stopped processing the file.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Transport(String),
    #[error("{}", .message.as_deref().unwrap_or("catalog service returned an error"))]
    Application {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("malformed response: {0}")]
    Decode(String),
}

impl CatalogError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::Transport(err.to_string())
        }
    }

    /// True when the failure carries no server response at all.
    pub fn is_no_response(&self) -> bool {
        matches!(self, CatalogError::Timeout | CatalogError::Transport(_))
    }
}

/// The abstract remote operations the engine consumes.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchPage, CatalogError>;
    async fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<String>, CatalogError>;
    async fn upload_csv(&self, file: UploadFile) -> Result<UploadReceipt, CatalogError>;
    async fn load_index(&self) -> Result<serde_json::Value, CatalogError>;
    async fn stats(&self) -> Result<serde_json::Value, CatalogError>;
}

/// reqwest-backed implementation against the catalog HTTP API.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Single dispatch chokepoint: every outbound call picks up its
    /// request-class timeout here and is unwrapped from the API envelope.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<ApiEnvelope<T>, CatalogError> {
        let response = request
            .timeout(request_timeout(path))
            .send()
            .await
            .map_err(CatalogError::from_transport)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.message);
            return Err(CatalogError::Application {
                status: Some(status),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))?;
        if let Some(perf) = &envelope.performance {
            tracing::debug!(path, duration = %perf.duration, cached = ?perf.cached, "catalog timing");
        }
        accept(status, envelope)
    }
}

/// Reject envelopes the server itself marked as failed.
fn accept<T>(status: u16, envelope: ApiEnvelope<T>) -> Result<ApiEnvelope<T>, CatalogError> {
    if !envelope.success {
        return Err(CatalogError::Application {
            status: Some(status),
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn require_data<T>(envelope: ApiEnvelope<T>) -> Result<T, CatalogError> {
    envelope
        .data
        .ok_or_else(|| CatalogError::Decode("envelope missing data field".to_string()))
}

#[async_trait]
impl CatalogBackend for HttpCatalog {
    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchPage, CatalogError> {
        let path = "/search";
        let request = self.client.get(self.url(path)).query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ]);
        let envelope = self.dispatch::<SearchPage>(request, path).await?;
        require_data(envelope)
    }

    async fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<String>, CatalogError> {
        let path = "/suggest";
        let request = self
            .client
            .get(self.url(path))
            .query(&[("q", prefix.to_string()), ("limit", limit.to_string())]);
        let envelope = self.dispatch::<SuggestPayload>(request, path).await?;
        Ok(envelope
            .data
            .map(|payload| payload.suggestions)
            .unwrap_or_default())
    }

    async fn upload_csv(&self, file: UploadFile) -> Result<UploadReceipt, CatalogError> {
        let path = "/upload/csv";
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.client.post(self.url(path)).multipart(form);
        let envelope = self.dispatch::<serde_json::Value>(request, path).await?;
        Ok(UploadReceipt {
            message: envelope.message,
        })
    }

    async fn load_index(&self) -> Result<serde_json::Value, CatalogError> {
        let path = "/index/load";
        let request = self.client.post(self.url(path));
        let envelope = self.dispatch::<serde_json::Value>(request, path).await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    async fn stats(&self) -> Result<serde_json::Value, CatalogError> {
        let path = "/index/stats";
        let request = self.client.get(self.url(path));
        let envelope = self.dispatch::<serde_json::Value>(request, path).await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_envelope_surfaces_server_message() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "index not loaded"}"#).unwrap();
        let err = accept(200, envelope).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Application {
                status: Some(200),
                message: Some("index not loaded".to_string()),
            }
        );
        assert_eq!(err.to_string(), "index not loaded");
    }

    #[test]
    fn successful_envelope_passes_through() {
        let envelope: ApiEnvelope<SuggestPayload> =
            serde_json::from_str(r#"{"success": true, "data": {"suggestions": ["a", "b"]}}"#)
                .unwrap();
        let envelope = accept(200, envelope).unwrap();
        assert_eq!(require_data(envelope).unwrap().suggestions.len(), 2);
    }

    #[test]
    fn missing_data_is_a_decode_error() {
        let envelope: ApiEnvelope<SearchPage> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            require_data(envelope),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn no_response_classification() {
        assert!(CatalogError::Timeout.is_no_response());
        assert!(CatalogError::Transport("refused".into()).is_no_response());
        assert!(!CatalogError::Application {
            status: Some(500),
            message: None
        }
        .is_no_response());
    }
}
