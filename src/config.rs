use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("./data/documents.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Result count requested from `POST /search`.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Context count requested from `POST /qa`.
    #[serde(default = "default_qa_top_k")]
    pub qa_top_k: u32,
    /// Minimum relevance score a result must reach to be shown.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Recency window for results: "7", "30", "90", or "all".
    #[serde(default = "default_recency_days")]
    pub recency_days: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            qa_top_k: default_qa_top_k(),
            min_confidence: default_min_confidence(),
            recency_days: default_recency_days(),
        }
    }
}

fn default_top_k() -> u32 {
    8
}
fn default_qa_top_k() -> u32 {
    3
}
fn default_min_confidence() -> f64 {
    0.1
}
fn default_recency_days() -> String {
    "30".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    // A missing config file is not an error: the console works against a
    // local backend with built-in defaults. A present but unreadable or
    // invalid file is.
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate backend
    if config.backend.base_url.trim().is_empty() {
        anyhow::bail!("backend.base_url must not be empty");
    }
    if config.backend.timeout_secs == 0 {
        anyhow::bail!("backend.timeout_secs must be > 0");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if config.retrieval.qa_top_k < 1 {
        anyhow::bail!("retrieval.qa_top_k must be >= 1");
    }
    if !(0.0..=1.0).contains(&config.retrieval.min_confidence) {
        anyhow::bail!("retrieval.min_confidence must be in [0.0, 1.0]");
    }
    match config.retrieval.recency_days.as_str() {
        "7" | "30" | "90" | "all" => {}
        other => anyhow::bail!(
            "Unknown retrieval.recency_days: '{}'. Must be 7, 30, 90, or all.",
            other
        ),
    }

    Ok(config)
}
