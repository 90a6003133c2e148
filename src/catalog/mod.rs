//! Remote product catalog: wire types, the backend seam, and the HTTP client.
//!
//! The engine never talks to the network directly; it goes through the
//! [`CatalogBackend`] trait so tests can substitute a scripted backend.

pub mod remote;
pub mod schema;
pub mod timeout;

pub use remote::{CatalogBackend, CatalogError, HttpCatalog};
pub use schema::{ApiEnvelope, Product, SearchPage, UploadFile, UploadReceipt};
pub use timeout::request_timeout;
