// src/portfolio/mod.rs
//! Portfolio similarity index: tech-stack text in, showcase links out

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod bootstrap;
pub mod embedding;
pub mod store;

pub use bootstrap::{load_portfolio_csv, BootstrapReport};
pub use embedding::{Embedder, HashingEmbedder};
pub use store::SqlitePortfolioStore;

/// One showcase project: the searchable stack text and its link payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub id: String,
    pub tech_stack: String,
    pub link: String,
}

impl PortfolioEntry {
    /// New entry with a freshly generated identifier.
    pub fn new(tech_stack: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tech_stack: tech_stack.into(),
            link: link.into(),
        }
    }
}

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn add(&self, entries: &[PortfolioEntry]) -> Result<()>;

    /// For each query text, up to `limit` link payloads, nearest first.
    async fn query(&self, texts: &[String], limit: usize) -> Result<Vec<Vec<String>>>;

    async fn count(&self) -> Result<usize>;

    /// Remove every entry; the next bootstrap repopulates from the CSV.
    async fn clear(&self) -> Result<usize>;

    async fn health_check(&self) -> Result<()> {
        self.count().await.map(|_| ())
    }
}

/// A store paired with the tabular source that seeds it on first use.
pub struct Portfolio {
    store: Arc<dyn PortfolioStore>,
    source_csv: PathBuf,
    bootstrap_lock: Mutex<()>,
}

impl Portfolio {
    pub fn new(store: Arc<dyn PortfolioStore>, source_csv: PathBuf) -> Self {
        Self {
            store,
            source_csv,
            bootstrap_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn PortfolioStore> {
        &self.store
    }

    /// Populate the store from the CSV if, and only if, it is empty.
    pub async fn ensure_loaded(&self) -> Result<BootstrapReport> {
        let _guard = self.bootstrap_lock.lock().await;
        bootstrap::bootstrap_if_empty(self.store.as_ref(), &self.source_csv).await
    }
}
