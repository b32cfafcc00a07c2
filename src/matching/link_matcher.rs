// src/matching/link_matcher.rs
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::portfolio::PortfolioStore;

/// Number of portfolio links requested per job.
pub const MATCH_COUNT: usize = 2;

pub struct LinkMatcher {
    store: Arc<dyn PortfolioStore>,
    limit: usize,
}

impl LinkMatcher {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self {
            store,
            limit: MATCH_COUNT,
        }
    }

    /// Nearest portfolio links for the job's skills, in store order.
    /// Blank skills short-circuit without touching the store.
    pub async fn match_links(&self, skills: &str) -> Result<Vec<String>, PipelineError> {
        if skills.trim().is_empty() {
            debug!("No skills to match, skipping portfolio query");
            return Ok(Vec::new());
        }

        let results = self
            .store
            .query(&[skills.to_string()], self.limit)
            .await
            .map_err(PipelineError::store)?;

        let links: Vec<String> = results.into_iter().flatten().collect();
        info!("Matched {} portfolio links", links.len());
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PortfolioEntry;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        queries: AtomicUsize,
        last_limit: Mutex<Option<usize>>,
    }

    #[async_trait]
    impl PortfolioStore for RecordingStore {
        async fn add(&self, _entries: &[PortfolioEntry]) -> Result<()> {
            Ok(())
        }

        async fn query(&self, texts: &[String], limit: usize) -> Result<Vec<Vec<String>>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            *self.last_limit.lock().unwrap() = Some(limit);
            Ok(texts
                .iter()
                .map(|_| vec!["https://a.example".to_string(), "https://b.example".to_string()])
                .collect())
        }

        async fn count(&self) -> Result<usize> {
            Ok(0)
        }

        async fn clear(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_empty_skills_skip_store() {
        let store = Arc::new(RecordingStore::default());
        let matcher = LinkMatcher::new(store.clone());

        for skills in ["", "   ", "\n\t"] {
            assert!(matcher.match_links(skills).await.unwrap().is_empty());
        }
        assert_eq!(store.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_queries_fixed_count() {
        let store = Arc::new(RecordingStore::default());
        let matcher = LinkMatcher::new(store.clone());

        let links = matcher.match_links("Rust, Tokio").await.unwrap();
        assert_eq!(links, vec!["https://a.example", "https://b.example"]);
        assert_eq!(store.queries.load(Ordering::SeqCst), 1);
        assert_eq!(*store.last_limit.lock().unwrap(), Some(MATCH_COUNT));
    }
}
