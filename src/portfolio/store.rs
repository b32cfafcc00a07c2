// src/portfolio/store.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use super::embedding::{cosine, Embedder};
use super::{PortfolioEntry, PortfolioStore};
use crate::app_log;
use crate::core::Database;

pub const DEFAULT_COLLECTION: &str = "portfolio";

/// Portfolio entries and their embeddings persisted in a local SQLite file.
///
/// Every row records the model that produced its vector. Opening the store
/// re-embeds rows written by a different model, so queries never compare
/// vectors from two embedding spaces.
pub struct SqlitePortfolioStore {
    db: Database,
    collection: String,
    embedder: Arc<Embedder>,
}

#[derive(sqlx::FromRow)]
struct StoredVector {
    link: String,
    embedding: String,
}

impl SqlitePortfolioStore {
    /// Open the default `portfolio` collection under `store_dir`.
    pub async fn open(store_dir: &Path, embedder: Arc<Embedder>) -> Result<Self> {
        Self::open_collection(store_dir, DEFAULT_COLLECTION, embedder).await
    }

    pub async fn open_collection(
        store_dir: &Path,
        collection: &str,
        embedder: Arc<Embedder>,
    ) -> Result<Self> {
        let db = Database::open(store_dir).await?;
        let store = Self {
            db,
            collection: collection.to_string(),
            embedder,
        };
        store.reembed_stale().await?;
        Ok(store)
    }

    fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn model_name(&self) -> &'static str {
        self.embedder.model_name()
    }

    /// Every entry of the collection in insertion order.
    pub async fn entries(&self) -> Result<Vec<PortfolioEntry>> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, tech_stack, link FROM portfolio_entries WHERE collection = ? ORDER BY seq",
        )
        .bind(&self.collection)
        .fetch_all(self.pool())
        .await
        .context("Failed to list portfolio entries")?;

        Ok(rows
            .into_iter()
            .map(|(id, tech_stack, link)| PortfolioEntry {
                id,
                tech_stack,
                link,
            })
            .collect())
    }

    // Model inference is CPU bound and blocking.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let embedder = self.embedder.clone();
        tokio::task::spawn_blocking(move || embedder.embed_batch(&texts))
            .await
            .context("Embedding task failed")?
    }

    async fn reembed_stale(&self) -> Result<()> {
        let stale = sqlx::query_as::<_, (i64, String)>(
            "SELECT seq, tech_stack FROM portfolio_entries WHERE collection = ? AND embedding_model != ? ORDER BY seq",
        )
        .bind(&self.collection)
        .bind(self.model_name())
        .fetch_all(self.pool())
        .await
        .context("Failed to find stale portfolio vectors")?;

        if stale.is_empty() {
            return Ok(());
        }

        let (seqs, texts): (Vec<i64>, Vec<String>) = stale.into_iter().unzip();
        let vectors = self.embed(texts).await?;

        for (seq, vector) in seqs.iter().zip(vectors) {
            let embedding =
                serde_json::to_string(&vector).context("Failed to serialize embedding")?;
            sqlx::query("UPDATE portfolio_entries SET embedding = ?, embedding_model = ? WHERE seq = ?")
                .bind(embedding)
                .bind(self.model_name())
                .bind(seq)
                .execute(self.pool())
                .await
                .context("Failed to update portfolio vector")?;
        }

        app_log!(
            info,
            "Re-embedded {} portfolio entries with {}",
            seqs.len(),
            self.model_name()
        );
        Ok(())
    }

    async fn load_vectors(&self) -> Result<Vec<(String, Vec<f32>)>> {
        let rows = sqlx::query_as::<_, StoredVector>(
            "SELECT link, embedding FROM portfolio_entries WHERE collection = ? AND embedding_model = ? ORDER BY seq",
        )
        .bind(&self.collection)
        .bind(self.model_name())
        .fetch_all(self.pool())
        .await
        .context("Failed to load portfolio vectors")?;

        rows.into_iter()
            .map(|row| {
                let vector: Vec<f32> = serde_json::from_str(&row.embedding)
                    .with_context(|| format!("Corrupt embedding stored for {}", row.link))?;
                Ok((row.link, vector))
            })
            .collect()
    }
}

#[async_trait]
impl PortfolioStore for SqlitePortfolioStore {
    async fn add(&self, entries: &[PortfolioEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let texts = entries.iter().map(|entry| entry.tech_stack.clone()).collect();
        let vectors = self.embed(texts).await?;

        for (entry, vector) in entries.iter().zip(vectors) {
            let embedding =
                serde_json::to_string(&vector).context("Failed to serialize embedding")?;

            sqlx::query(
                r#"
                INSERT INTO portfolio_entries (id, collection, tech_stack, link, embedding, embedding_model, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.id)
            .bind(&self.collection)
            .bind(&entry.tech_stack)
            .bind(&entry.link)
            .bind(embedding)
            .bind(self.model_name())
            .bind(Utc::now())
            .execute(self.pool())
            .await
            .with_context(|| format!("Failed to insert portfolio entry {}", entry.id))?;
        }
        Ok(())
    }

    async fn query(&self, texts: &[String], limit: usize) -> Result<Vec<Vec<String>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.load_vectors().await?;
        let queries = self.embed(texts.to_vec()).await?;

        let results = queries
            .iter()
            .map(|query| {
                let mut scored: Vec<(f32, &str)> = vectors
                    .iter()
                    .map(|(link, vector)| (cosine(query, vector), link.as_str()))
                    .collect();
                // Stable sort: equal scores keep insertion order.
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
                scored
                    .into_iter()
                    .take(limit)
                    .map(|(_, link)| link.to_string())
                    .collect()
            })
            .collect();

        app_log!(
            debug,
            "Queried {} texts against {} portfolio entries",
            texts.len(),
            vectors.len()
        );
        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM portfolio_entries WHERE collection = ?")
                .bind(&self.collection)
                .fetch_one(self.pool())
                .await
                .context("Failed to count portfolio entries")?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn clear(&self) -> Result<usize> {
        let result = sqlx::query("DELETE FROM portfolio_entries WHERE collection = ?")
            .bind(&self.collection)
            .execute(self.pool())
            .await
            .context("Failed to clear portfolio entries")?;

        let removed = result.rows_affected() as usize;
        app_log!(info, "Cleared {} portfolio entries", removed);
        Ok(removed)
    }

    async fn health_check(&self) -> Result<()> {
        self.db.health_check().await
    }
}
