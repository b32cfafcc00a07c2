// src/pipeline.rs
//! Fetch → extract → match → compose, one strictly sequential pass per request

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::composer::EmailComposer;
use crate::core::ConfigManager;
use crate::error::PipelineError;
use crate::extraction::JobExtractor;
use crate::llm::{ChatClient, LanguageModel};
use crate::matching::LinkMatcher;
use crate::portfolio::{Embedder, Portfolio, SqlitePortfolioStore};
use crate::scraping::{PageFetcher, WebPageFetcher};
use crate::types::{GeneratedEmail, JobInput, JobRecord, SenderProfile};

/// Anything that can turn a job input and sender profile into a draft.
/// Sessions and the web surface depend on this seam, not the concrete pipeline.
#[async_trait]
pub trait EmailGenerator: Send + Sync {
    async fn generate(
        &self,
        input: JobInput,
        sender: &SenderProfile,
    ) -> Result<GeneratedEmail, PipelineError>;
}

pub struct EmailPipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: JobExtractor,
    matcher: LinkMatcher,
    composer: EmailComposer,
    portfolio: Portfolio,
}

impl EmailPipeline {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        fetcher: Arc<dyn PageFetcher>,
        portfolio: Portfolio,
    ) -> Self {
        Self {
            fetcher,
            extractor: JobExtractor::new(model.clone()),
            matcher: LinkMatcher::new(portfolio.store().clone()),
            composer: EmailComposer::new(model),
            portfolio,
        }
    }

    /// Wire the production collaborators: chat API, HTTP fetcher, SQLite store.
    pub async fn from_config(config: &ConfigManager) -> Result<Self> {
        let model: Arc<dyn LanguageModel> = Arc::new(ChatClient::new(&config.llm)?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(WebPageFetcher::new()?);
        let embedder = Arc::new(Embedder::load(&config.embedding).await);
        info!("Portfolio embeddings: {}", embedder.model_name());
        let store = SqlitePortfolioStore::open(&config.environment.store_path, embedder).await?;
        let portfolio = Portfolio::new(
            Arc::new(store),
            config.environment.portfolio_csv.clone(),
        );
        Ok(Self::new(model, fetcher, portfolio))
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Scrape the page and extract the posting's fields.
    pub async fn extract_from_url(&self, url: &str) -> Result<JobRecord, PipelineError> {
        let page_text = self
            .fetcher
            .fetch_text(url)
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;
        self.extractor.extract(&page_text).await
    }

    async fn resolve_job(&self, input: JobInput) -> Result<JobRecord, PipelineError> {
        match input {
            JobInput::Url(url) => self.extract_from_url(&url).await,
            JobInput::Manual(job) => Ok(job),
        }
    }
}

#[async_trait]
impl EmailGenerator for EmailPipeline {
    async fn generate(
        &self,
        input: JobInput,
        sender: &SenderProfile,
    ) -> Result<GeneratedEmail, PipelineError> {
        if let Some(field) = sender.missing_required_field() {
            return Err(PipelineError::Validation { field });
        }

        self.portfolio
            .ensure_loaded()
            .await
            .map_err(PipelineError::store)?;

        let job = self.resolve_job(input).await?;
        let links = self.matcher.match_links(&job.skills).await?;
        let draft = self.composer.compose(&job, &links, sender).await?;

        info!(
            "Generated email for '{}' with {} portfolio links",
            job.role,
            links.len()
        );

        Ok(GeneratedEmail { job, links, draft })
    }
}
