// src/core/config_manager.rs
//! Unified configuration management: optional config.yaml, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_TTL_SECS: u64 = 2 * 60 * 60;
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// CSV with `Techstack` and `Links` columns, read once to seed the store.
    pub portfolio_csv: PathBuf,
    /// Directory holding the persisted portfolio store.
    pub store_path: PathBuf,
    /// Where `generate --output` drafts land when given a bare file name.
    pub output_path: PathBuf,
    /// Web sessions untouched for this long are dropped.
    pub session_ttl_seconds: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            portfolio_csv: PathBuf::from("my_portfolio.csv"),
            store_path: PathBuf::from("vector_db_store"),
            output_path: PathBuf::from("out"),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_seconds: DEFAULT_LLM_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY (or LLM_API_KEY) environment variable not set"))
    }
}

/// Which embedding backend ranks portfolio entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// all-MiniLM-L6-v2 through fastembed; downloaded into `cache_dir` on first use.
    #[default]
    Minilm,
    /// Hashed bag-of-words; no model download, keyword overlap only.
    Hashing,
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "minilm" => Ok(Self::Minilm),
            "hashing" => Ok(Self::Hashing),
            other => anyhow::bail!("Unknown embedding backend '{}' (expected minilm or hashing)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            cache_dir: PathBuf::from("models"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvironmentSection {
    #[serde(flatten)]
    paths: EnvironmentConfig,
    llm: LlmConfig,
    embedding: EmbeddingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentSection,
    production: EnvironmentSection,
}

impl ConfigManager {
    /// Load all configurations from the working directory
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir)
    }

    /// Load configuration rooted at `base_dir`; relative paths resolve against it
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let environment_name = Self::get_environment();
        info!("Loading configuration for environment: {}", environment_name);

        let section = Self::load_section(&base_dir.join(CONFIG_FILE), &environment_name)?;
        let mut environment = section.paths;
        let mut llm = section.llm;
        let mut embedding = section.embedding;

        if let Ok(path) = std::env::var("PORTFOLIO_CSV") {
            environment.portfolio_csv = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PORTFOLIO_STORE_PATH") {
            environment.store_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            llm.model = model;
        }
        if let Ok(backend) = std::env::var("PORTFOLIO_EMBEDDER") {
            embedding.backend = backend.parse()?;
        }
        llm.api_key = std::env::var("GROQ_API_KEY")
            .or_else(|_| std::env::var("LLM_API_KEY"))
            .ok();

        environment.portfolio_csv = resolve_path(base_dir, &environment.portfolio_csv);
        environment.store_path = resolve_path(base_dir, &environment.store_path);
        environment.output_path = resolve_path(base_dir, &environment.output_path);
        embedding.cache_dir = resolve_path(base_dir, &embedding.cache_dir);

        Ok(Self {
            environment_name,
            environment,
            llm,
            embedding,
        })
    }

    fn get_environment() -> String {
        std::env::var("COLD_MAIL_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(config_path: &Path, environment_name: &str) -> Result<EnvironmentSection> {
        if !config_path.exists() {
            info!(
                "{} not found, using built-in defaults",
                config_path.display()
            );
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config_file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(match environment_name {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.environment.store_path).await?;
        FsOps::ensure_dir_exists(&self.environment.output_path).await?;
        Ok(())
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
