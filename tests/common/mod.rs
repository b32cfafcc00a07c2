#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use cold_mail::llm::LanguageModel;
use cold_mail::portfolio::embedding::{cosine, HashingEmbedder};
use cold_mail::portfolio::{PortfolioEntry, PortfolioStore};
use cold_mail::scraping::PageFetcher;
use cold_mail::SenderProfile;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays canned completions in order and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(reason.to_string())])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Err(anyhow::anyhow!("no scripted reply left")),
        }
    }
}

/// Serves one fixed page body, or fails every request.
pub struct FakeFetcher {
    page: Option<String>,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serving(page: &str) -> Self {
        Self {
            page: Some(page.to_string()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            page: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.urls.lock().unwrap().push(url.to_string());
        self.page
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

/// In-memory store ranking by the same hashed embedding as the SQLite store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<PortfolioEntry>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn with_entries(rows: &[(&str, &str)]) -> Self {
        let store = Self::default();
        *store.entries.lock().unwrap() = rows
            .iter()
            .map(|(stack, link)| PortfolioEntry::new(*stack, *link))
            .collect();
        store
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn add(&self, entries: &[PortfolioEntry]) -> Result<()> {
        self.entries.lock().unwrap().extend_from_slice(entries);
        Ok(())
    }

    async fn query(&self, texts: &[String], limit: usize) -> Result<Vec<Vec<String>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let embedder = HashingEmbedder;
        let entries = self.entries.lock().unwrap().clone();

        Ok(texts
            .iter()
            .map(|text| {
                let query = embedder.embed(text);
                let mut scored: Vec<(f32, String)> = entries
                    .iter()
                    .map(|e| (cosine(&query, &embedder.embed(&e.tech_stack)), e.link.clone()))
                    .collect();
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
                scored.into_iter().take(limit).map(|(_, link)| link).collect()
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.lock().unwrap().len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

/// A store whose backing database is gone: every call fails.
pub struct UnavailableStore;

#[async_trait]
impl PortfolioStore for UnavailableStore {
    async fn add(&self, _entries: &[PortfolioEntry]) -> Result<()> {
        anyhow::bail!("database is closed")
    }

    async fn query(&self, _texts: &[String], _limit: usize) -> Result<Vec<Vec<String>>> {
        anyhow::bail!("database is closed")
    }

    async fn count(&self) -> Result<usize> {
        anyhow::bail!("database is closed")
    }

    async fn clear(&self) -> Result<usize> {
        anyhow::bail!("database is closed")
    }
}

pub const PORTFOLIO_CSV: &str = "\
Techstack,Links
\"React, Node.js, MongoDB\",https://example.com/react-portfolio
\"Python, Django, PostgreSQL\",https://example.com/python-portfolio
\"Kotlin, Android, Firebase\",https://example.com/android-portfolio
";

pub const EXTRACTED_JOB: &str = r#"```json
{"role": "Frontend Engineer", "experience": "3+ years", "skills": ["React", "Node.js"], "description": "Build dashboards"}
```"#;

pub const DRAFT: &str = "Subject: Frontend help for your team\n\nDear Hiring Manager,";

pub fn sender() -> SenderProfile {
    SenderProfile {
        name: "Mohan".to_string(),
        job_title: "Business Development Executive".to_string(),
        skills: "Delivery management".to_string(),
        ..SenderProfile::default()
    }
}
