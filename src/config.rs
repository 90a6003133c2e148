use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration, loaded from a TOML file with per-field defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog API, e.g. `http://localhost:3000/api`.
    pub api_url: String,
    /// Results per page for search requests.
    pub page_size: u32,
    /// Maximum number of autocomplete suggestions per request.
    pub suggest_limit: u32,
    /// Quiet window before a typed query is sent, in milliseconds.
    pub search_debounce_ms: u64,
    /// Quiet window before a suggestion prefix is sent, in milliseconds.
    pub suggest_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            page_size: 20,
            suggest_limit: 10,
            search_debounce_ms: 300,
            suggest_debounce_ms: 200,
        }
    }
}

impl Config {
    /// Platform config file location (`<config dir>/prodseek/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "prodseek")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist; the default location falls back to
    /// built-in defaults when absent.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(raw) => {
                let expanded = shellexpand::tilde(raw).to_string();
                let text = std::fs::read_to_string(&expanded)
                    .with_context(|| format!("Failed to read config file {expanded}"))?;
                Self::parse(&text)
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => {
                    let text = std::fs::read_to_string(&p)
                        .with_context(|| format!("Failed to read config file {}", p.display()))?;
                    Self::parse(&text)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config file")?;
        Ok(config)
    }
}
