//! prodseek: reactive search client for a remote product catalog.
//!
//! The crate is split along the data flow: [`catalog`] talks to the remote
//! service, [`pipeline`] provides the event-damping primitives (debounce,
//! dedup, switch-to-latest), and [`engine`] composes them into a single-task
//! coordinator that a UI shell observes through a watch channel.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod pipeline;

pub use catalog::{CatalogBackend, CatalogError, HttpCatalog};
pub use config::Config;
pub use engine::{EngineHandle, EngineOptions, EngineView};
