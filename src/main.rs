use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use prodseek::catalog::UploadFile;
use prodseek::engine::{self, format_file_size, EngineOptions, EngineView};
use prodseek::{CatalogBackend, Config, HttpCatalog};

#[derive(Parser)]
#[command(name = "prodseek", version, about = "Search client for a remote product catalog")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override the catalog API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// One-shot catalog search.
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Autocomplete suggestions for a prefix.
    Suggest {
        prefix: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Upload a CSV file for asynchronous indexing.
    Upload { file: PathBuf },
    /// Trigger a server-side index load.
    Load,
    /// Show index statistics.
    Stats,
    /// Interactive mode: drives the reactive engine from stdin.
    Live,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    let catalog = HttpCatalog::new(&config.api_url)?;

    match cli.command {
        CliCommand::Search { query, page, limit } => {
            let limit = limit.unwrap_or(config.page_size);
            let result = catalog.search(&query, page, limit).await?;
            println!(
                "{} results (page {}/{})",
                result.total, result.page, result.total_pages
            );
            for product in &result.items {
                let price = product
                    .price
                    .map(|p| format!(" @ {p:.2}"))
                    .unwrap_or_default();
                println!("  {} [{}] {}{}", product.sku, product.brand, product.title, price);
            }
        }
        CliCommand::Suggest { prefix, limit } => {
            let limit = limit.unwrap_or(config.suggest_limit);
            for suggestion in catalog.suggest(&prefix, limit).await? {
                println!("{suggestion}");
            }
        }
        CliCommand::Upload { file } => {
            let upload = read_upload(&file).await?;
            println!(
                "Uploading {} ({})...",
                upload.name,
                format_file_size(upload.size())
            );
            let receipt = catalog.upload_csv(upload).await?;
            println!(
                "{}",
                receipt
                    .message
                    .unwrap_or_else(|| "Upload accepted".to_string())
            );
        }
        CliCommand::Load => {
            let data = catalog.load_index().await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        CliCommand::Stats => {
            let stats = catalog.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        CliCommand::Live => live(config, catalog).await?,
    }
    Ok(())
}

async fn read_upload(path: &PathBuf) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    Ok(UploadFile::new(name, bytes))
}

/// Minimal interactive shell over the engine. Plain text searches; colon
/// commands map onto the remaining engine entry points.
async fn live(config: Config, catalog: HttpCatalog) -> Result<()> {
    let backend: Arc<dyn CatalogBackend> = Arc::new(catalog);
    let handle = engine::spawn(backend, EngineOptions::from_config(&config));

    let mut watcher = handle.watch();
    tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let view = watcher.borrow_and_update().clone();
            render(&view);
        }
    });

    println!(
        "type to search; :page N, :limit N, :pick N, :filter TAG, :unfilter TAG, \
         :upload PATH, :clear, :quit"
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line == ":quit" {
            break;
        } else if line == ":clear" {
            handle.clear();
        } else if let Some(rest) = line.strip_prefix(":page ") {
            if let Ok(page) = rest.trim().parse::<u32>() {
                let limit = handle.view().limit;
                handle.page_changed(page.saturating_sub(1), limit);
            }
        } else if let Some(rest) = line.strip_prefix(":limit ") {
            if let Ok(limit) = rest.trim().parse::<u32>() {
                handle.page_changed(0, limit);
            }
        } else if let Some(rest) = line.strip_prefix(":pick ") {
            if let Ok(index) = rest.trim().parse::<usize>() {
                if let Some(suggestion) = handle.view().suggestions.get(index) {
                    handle.pick_suggestion(suggestion.clone());
                }
            }
        } else if let Some(tag) = line.strip_prefix(":filter ") {
            handle.add_filter(tag.trim());
        } else if let Some(tag) = line.strip_prefix(":unfilter ") {
            handle.remove_filter(tag.trim());
        } else if let Some(path) = line.strip_prefix(":upload ") {
            match read_upload(&PathBuf::from(path.trim())).await {
                Ok(file) => {
                    handle.select_file(file);
                    handle.start_upload();
                }
                Err(err) => eprintln!("{err:#}"),
            }
        } else {
            handle.input_changed(line);
        }
    }
    Ok(())
}

fn render(view: &EngineView) {
    if view.loading {
        println!("… searching");
        return;
    }
    if !view.query.is_empty() {
        println!(
            "\"{}\": {} results (page {}/{})",
            view.query, view.total, view.page, view.total_pages
        );
        for product in view.items.iter().take(10) {
            println!("  {} [{}] {}", product.sku, product.brand, product.title);
        }
    }
    if !view.suggestions.is_empty() {
        println!("  suggestions: {}", view.suggestions.join(", "));
    }
    if !view.active_filters.is_empty() {
        println!("  filters: {}", view.active_filters.join(", "));
    }
    if !view.upload_message.is_empty() {
        println!("  {}", view.upload_message);
    }
    if let Some(err) = &view.last_error {
        println!("  search error: {err}");
    }
}
