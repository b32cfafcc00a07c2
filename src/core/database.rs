// src/core/database.rs
//! SQLite connection management for the persisted portfolio store

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

use crate::app_log;
use crate::core::FsOps;

pub const STORE_FILE_NAME: &str = "portfolio.sqlite3";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the store file inside `store_dir` and run migrations
    pub async fn open(store_dir: &Path) -> Result<Self> {
        FsOps::ensure_dir_exists(store_dir).await?;
        let database_path = store_dir.join(STORE_FILE_NAME);

        let options = SqliteConnectOptions::new()
            .filename(&database_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to database: {}", database_path.display())
            })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS portfolio_entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                collection TEXT NOT NULL,
                tech_stack TEXT NOT NULL,
                link TEXT NOT NULL,
                embedding TEXT NOT NULL,
                embedding_model TEXT NOT NULL DEFAULT 'hashing-fnv-256',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create portfolio_entries table")?;

        // Stores created before vectors carried their model name.
        let (has_model_column,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pragma_table_info('portfolio_entries') WHERE name = 'embedding_model'",
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to inspect portfolio_entries columns")?;

        if has_model_column == 0 {
            sqlx::query(
                "ALTER TABLE portfolio_entries ADD COLUMN embedding_model TEXT NOT NULL DEFAULT 'hashing-fnv-256'",
            )
            .execute(&self.pool)
            .await
            .context("Failed to add embedding_model column")?;
            app_log!(info, "Added embedding_model column to portfolio_entries");
        }

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_portfolio_collection ON portfolio_entries(collection);",
        )
        .execute(&self.pool)
        .await?;

        app_log!(debug, "Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}
