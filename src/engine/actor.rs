//! The engine's event loop.
//!
//! Everything here runs on one task: commands, debounce expiries, and call
//! completions are serialized through a single `select!`, so every state
//! transition is atomic with respect to every other event. Backend calls are
//! the only thing spawned out, and each carries the generation of the flight
//! it was issued under.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::catalog::{CatalogBackend, CatalogError, SearchPage, UploadReceipt};
use crate::pipeline::{DebounceWindow, Distinct, FlightSwitch};

use super::upload::UploadSession;
use super::view::{EngineView, SelectedFile};
use super::{Command, EngineOptions, Pager, QueryIntent};

/// Completion of a spawned backend call, tagged with its flight generation.
enum PipelineEvent {
    SearchDone {
        generation: u64,
        outcome: Result<SearchPage, CatalogError>,
    },
    SuggestDone {
        generation: u64,
        outcome: Result<Vec<String>, CatalogError>,
    },
    UploadDone {
        outcome: Result<UploadReceipt, CatalogError>,
    },
}

pub(crate) struct Engine {
    backend: Arc<dyn CatalogBackend>,
    options: EngineOptions,
    commands: mpsc::UnboundedReceiver<Command>,
    events_tx: mpsc::UnboundedSender<PipelineEvent>,
    events_rx: mpsc::UnboundedReceiver<PipelineEvent>,
    view_tx: watch::Sender<EngineView>,

    query: String,
    pager: Pager,
    results: SearchPage,
    loading: bool,
    suggestions: Vec<String>,
    filters: Vec<String>,
    last_error: Option<String>,

    search_debounce: DebounceWindow<QueryIntent>,
    suggest_debounce: DebounceWindow<String>,
    search_dedup: Distinct<QueryIntent>,
    suggest_dedup: Distinct<String>,
    search_flight: FlightSwitch,
    suggest_flight: FlightSwitch,

    upload: UploadSession,
    banner_reset_at: Option<Instant>,
}

impl Engine {
    pub(crate) fn new(
        backend: Arc<dyn CatalogBackend>,
        options: EngineOptions,
        commands: mpsc::UnboundedReceiver<Command>,
        view_tx: watch::Sender<EngineView>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            pager: Pager::new(options.page_size),
            search_debounce: DebounceWindow::new(options.search_debounce),
            suggest_debounce: DebounceWindow::new(options.suggest_debounce),
            options,
            commands,
            events_tx,
            events_rx,
            view_tx,
            query: String::new(),
            results: SearchPage::default(),
            loading: false,
            suggestions: Vec::new(),
            filters: Vec::new(),
            last_error: None,
            search_dedup: Distinct::new(),
            suggest_dedup: Distinct::new(),
            search_flight: FlightSwitch::new(),
            suggest_flight: FlightSwitch::new(),
            upload: UploadSession::Idle,
            banner_reset_at: None,
        }
    }

    pub(crate) async fn run(mut self) {
        self.publish();
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
                _ = wait_until(self.search_debounce.deadline()),
                    if self.search_debounce.is_armed() => self.fire_search(),
                _ = wait_until(self.suggest_debounce.deadline()),
                    if self.suggest_debounce.is_armed() => self.fire_suggest(),
                _ = wait_until(self.banner_reset_at),
                    if self.banner_reset_at.is_some() => {
                        self.banner_reset_at = None;
                        self.upload.reset_banner();
                    },
                Some(event) = self.events_rx.recv() => self.on_event(event),
            }
            self.publish();
        }
        tracing::debug!("engine shut down");
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::InputChanged(text) => {
                self.query = text;
                self.pager.reset();
                self.search_debounce.push(self.current_intent());
                self.suggest_debounce.push(self.query.clone());
            }
            Command::ExplicitSearch => self.explicit_search(),
            Command::PageChanged {
                page_index,
                page_size,
            } => {
                // Nothing to page through without a query.
                if self.query.trim().is_empty() {
                    return;
                }
                self.pager.apply(page_index, page_size);
                // Pagination skips the typing debounce but keeps dedup and
                // the cancellation rule.
                let intent = self.current_intent();
                if self.search_dedup.admit(intent.clone()) {
                    self.submit_search(intent);
                }
            }
            Command::Clear => {
                self.query.clear();
                self.results = SearchPage::default();
                self.suggestions.clear();
                self.last_error = None;
            }
            Command::PickSuggestion(suggestion) => {
                self.query = suggestion;
                self.suggestions.clear();
                self.explicit_search();
            }
            Command::AddFilter(tag) => {
                if !self.filters.contains(&tag) {
                    self.filters.push(tag);
                    self.retrigger_after_filter_change();
                }
            }
            Command::RemoveFilter(tag) => {
                if let Some(index) = self.filters.iter().position(|t| t == &tag) {
                    self.filters.remove(index);
                    self.retrigger_after_filter_change();
                }
            }
            Command::SelectFile(file) => {
                if !self.upload.select(file) {
                    tracing::debug!("file selection ignored while an upload is in flight");
                }
            }
            Command::StartUpload => self.start_upload(),
        }
    }

    fn current_intent(&self) -> QueryIntent {
        QueryIntent {
            text: self.query.clone(),
            page: self.pager.page(),
            limit: self.pager.limit(),
        }
    }

    fn explicit_search(&mut self) {
        if self.query.trim().is_empty() {
            return;
        }
        self.pager.reset();
        self.search_debounce.push(self.current_intent());
    }

    /// A filter change must re-issue the current intent even though the
    /// `(text, page, limit)` triple is unchanged, so the dedup filter is
    /// reset first.
    fn retrigger_after_filter_change(&mut self) {
        self.search_dedup.reset();
        self.explicit_search();
    }

    fn fire_search(&mut self) {
        let Some(intent) = self.search_debounce.take_due() else {
            return;
        };
        if !self.search_dedup.admit(intent.clone()) {
            return;
        }
        if intent.text.trim().is_empty() {
            // Short-circuit: clear directly, and strand any in-flight call so
            // its late result cannot repopulate the cleared view.
            self.search_flight.invalidate();
            self.results = SearchPage::default();
            self.loading = false;
            return;
        }
        self.submit_search(intent);
    }

    fn submit_search(&mut self, intent: QueryIntent) {
        self.loading = true;
        let ticket = self.search_flight.begin();
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                outcome = backend.search(&intent.text, intent.page, intent.limit) => {
                    let _ = events.send(PipelineEvent::SearchDone {
                        generation: ticket.generation,
                        outcome,
                    });
                }
                _ = ticket.abort.cancelled() => {
                    tracing::debug!(generation = ticket.generation, "search call superseded");
                }
            }
        });
    }

    fn fire_suggest(&mut self) {
        let Some(prefix) = self.suggest_debounce.take_due() else {
            return;
        };
        if !self.suggest_dedup.admit(prefix.clone()) {
            return;
        }
        if prefix.trim().chars().count() < 2 {
            self.suggest_flight.invalidate();
            self.suggestions.clear();
            return;
        }
        let limit = self.options.suggest_limit;
        let ticket = self.suggest_flight.begin();
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                outcome = backend.suggest(&prefix, limit) => {
                    let _ = events.send(PipelineEvent::SuggestDone {
                        generation: ticket.generation,
                        outcome,
                    });
                }
                _ = ticket.abort.cancelled() => {
                    tracing::debug!(generation = ticket.generation, "suggest call superseded");
                }
            }
        });
    }

    fn start_upload(&mut self) {
        let Some(file) = self.upload.start() else {
            return;
        };
        tracing::info!(name = %file.name, size = file.size(), "starting bulk upload");
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = backend.upload_csv(file).await;
            let _ = events.send(PipelineEvent::UploadDone { outcome });
        });
    }

    fn on_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::SearchDone {
                generation,
                outcome,
            } => {
                if !self.search_flight.is_current(generation) {
                    tracing::debug!(generation, "stale search result ignored");
                    return;
                }
                self.loading = false;
                match outcome {
                    Ok(page) => {
                        self.results = page;
                        self.last_error = None;
                    }
                    Err(err) => {
                        // Transient failures never clear what the user sees.
                        tracing::warn!(error = %err, "search failed");
                        self.last_error = Some(err.to_string());
                    }
                }
            }
            PipelineEvent::SuggestDone {
                generation,
                outcome,
            } => {
                if !self.suggest_flight.is_current(generation) {
                    tracing::debug!(generation, "stale suggestions ignored");
                    return;
                }
                match outcome {
                    Ok(list) => self.suggestions = list,
                    Err(err) => {
                        tracing::warn!(error = %err, "suggest failed");
                        self.suggestions.clear();
                    }
                }
            }
            PipelineEvent::UploadDone { outcome } => match outcome {
                Ok(receipt) => {
                    self.upload.succeed(receipt.message);
                    self.banner_reset_at = Some(Instant::now() + self.options.success_banner);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "upload failed");
                    self.upload.fail(&err);
                }
            },
        }
    }

    fn publish(&self) {
        let view = EngineView {
            query: self.query.clone(),
            items: self.results.items.clone(),
            total: self.results.total,
            page: self.pager.page(),
            limit: self.pager.limit(),
            total_pages: self.results.total_pages,
            loading: self.loading,
            suggestions: self.suggestions.clone(),
            active_filters: self.filters.clone(),
            upload_status: self.upload.status(),
            upload_message: self.upload.message().to_string(),
            upload_file: self.upload.file().map(|file| SelectedFile {
                name: file.name.clone(),
                size: file.size(),
            }),
            last_error: self.last_error.clone(),
        };
        self.view_tx.send_replace(view);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
