// src/scraping/mod.rs
use anyhow::Result;
use async_trait::async_trait;

pub mod page_fetcher;

pub use page_fetcher::WebPageFetcher;

/// Turns a URL into the page's primary readable text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
