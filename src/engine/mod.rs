//! The reactive query-coordination engine.
//!
//! One tokio task ([`actor`]) owns all coordinator state. UI shells send
//! [`Command`]s through an [`EngineHandle`] and observe [`EngineView`]
//! snapshots on a watch channel; results of spawned backend calls come back
//! tagged with the generation they were issued under, so a stale response can
//! never overwrite a newer one.

pub mod actor;
pub mod pagination;
pub mod upload;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::catalog::{CatalogBackend, UploadFile};
use crate::config::Config;

pub use pagination::Pager;
pub use upload::{UploadSession, UploadStatus};
pub use view::{format_file_size, EngineView, SelectedFile};

/// A search request: query text plus the page window, compared structurally
/// for dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    pub text: String,
    pub page: u32,
    pub limit: u32,
}

/// UI events the engine accepts.
#[derive(Debug, Clone)]
pub enum Command {
    InputChanged(String),
    ExplicitSearch,
    PageChanged { page_index: u32, page_size: u32 },
    Clear,
    PickSuggestion(String),
    AddFilter(String),
    RemoveFilter(String),
    SelectFile(UploadFile),
    StartUpload,
}

/// Tuning knobs; every duration has the interactive defaults the UI was
/// designed around.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub page_size: u32,
    pub suggest_limit: u32,
    pub search_debounce: Duration,
    pub suggest_debounce: Duration,
    /// How long the upload success banner stays up before auto-reset.
    pub success_banner: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            suggest_limit: 10,
            search_debounce: Duration::from_millis(300),
            suggest_debounce: Duration::from_millis(200),
            success_banner: Duration::from_secs(5),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            suggest_limit: config.suggest_limit,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            suggest_debounce: Duration::from_millis(config.suggest_debounce_ms),
            ..Self::default()
        }
    }
}

/// Cloneable handle to a running engine. Dropping every handle shuts the
/// actor down.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<EngineView>,
}

impl EngineHandle {
    /// Current state snapshot.
    pub fn view(&self) -> EngineView {
        self.view.borrow().clone()
    }

    /// Watch channel for change notifications.
    pub fn watch(&self) -> watch::Receiver<EngineView> {
        self.view.clone()
    }

    fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    pub fn input_changed(&self, text: impl Into<String>) {
        self.send(Command::InputChanged(text.into()));
    }

    pub fn explicit_search(&self) {
        self.send(Command::ExplicitSearch);
    }

    pub fn page_changed(&self, page_index: u32, page_size: u32) {
        self.send(Command::PageChanged {
            page_index,
            page_size,
        });
    }

    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    pub fn pick_suggestion(&self, suggestion: impl Into<String>) {
        self.send(Command::PickSuggestion(suggestion.into()));
    }

    pub fn add_filter(&self, tag: impl Into<String>) {
        self.send(Command::AddFilter(tag.into()));
    }

    pub fn remove_filter(&self, tag: impl Into<String>) {
        self.send(Command::RemoveFilter(tag.into()));
    }

    pub fn select_file(&self, file: UploadFile) {
        self.send(Command::SelectFile(file));
    }

    pub fn start_upload(&self) {
        self.send(Command::StartUpload);
    }
}

/// Spawn the engine actor on the current runtime.
pub fn spawn(backend: Arc<dyn CatalogBackend>, options: EngineOptions) -> EngineHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(EngineView {
        limit: options.page_size,
        page: 1,
        ..EngineView::default()
    });
    tokio::spawn(actor::Engine::new(backend, options, commands_rx, view_tx).run());
    EngineHandle {
        commands: commands_tx,
        view: view_rx,
    }
}
