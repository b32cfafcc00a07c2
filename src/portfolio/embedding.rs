// src/portfolio/embedding.rs
//! Text embeddings for portfolio tech stacks.
//!
//! The default backend is all-MiniLM-L6-v2 run locally through `fastembed`.
//! The hashed bag-of-words backend needs no model download and is kept for
//! offline use and tests. Each persisted vector records which backend made it.

use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::core::config_manager::{EmbeddingBackend, EmbeddingConfig};

pub const MINILM_MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const HASHING_MODEL_NAME: &str = "hashing-fnv-256";

pub const HASHING_DIM: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub enum Embedder {
    /// `TextEmbedding::embed` needs `&mut self`, hence the mutex.
    MiniLm(Mutex<TextEmbedding>),
    Hashing(HashingEmbedder),
}

impl Embedder {
    pub fn hashing() -> Self {
        Self::Hashing(HashingEmbedder)
    }

    /// Build the configured backend. Loading the model is blocking (it may
    /// download weights), so it runs off the async executor. A model that
    /// cannot be loaded falls back to hashing with a warning.
    pub async fn load(config: &EmbeddingConfig) -> Self {
        if config.backend == EmbeddingBackend::Hashing {
            info!("Using hashing embedder ({})", HASHING_MODEL_NAME);
            return Self::hashing();
        }

        let cache_dir = config.cache_dir.clone();
        let loaded = tokio::task::spawn_blocking(move || {
            TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                    .with_cache_dir(cache_dir)
                    .with_show_download_progress(false),
            )
            .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await;

        match loaded {
            Ok(Ok(model)) => {
                info!("Loaded embedding model {}", MINILM_MODEL_NAME);
                Self::MiniLm(Mutex::new(model))
            }
            Ok(Err(e)) => {
                warn!("Embedding model unavailable ({}), falling back to hashing", e);
                Self::hashing()
            }
            Err(e) => {
                warn!("Embedding model loader panicked ({}), falling back to hashing", e);
                Self::hashing()
            }
        }
    }

    /// Stored next to every vector; vectors from different models never mix.
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::MiniLm(_) => MINILM_MODEL_NAME,
            Self::Hashing(_) => HASHING_MODEL_NAME,
        }
    }

    /// One vector per text, in order. Blocking for the model backend.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::MiniLm(model) => {
                let mut model = model
                    .lock()
                    .map_err(|_| anyhow::anyhow!("Embedding model lock poisoned"))?;
                model
                    .embed(texts.to_vec(), None)
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .context("Failed to embed portfolio text")
            }
            Self::Hashing(hashing) => Ok(texts.iter().map(|text| hashing.embed(text)).collect()),
        }
    }
}

/// Deterministic hashed bag-of-words. Only exact token overlap counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; HASHING_DIM];
        for token in tokenize(text) {
            vector[bucket(&token)] += 1.0;
        }

        // Sublinear term frequency, then unit length.
        for value in vector.iter_mut().filter(|v| **v > 0.0) {
            *value = 1.0 + value.ln();
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

/// Cosine similarity; mismatched lengths and zero vectors score zero.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Lowercased tokens; `+`, `#` and `.` stay attached so `c++`, `c#` and
/// `node.js` survive, but trailing dots are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

// FNV-1a: persisted vectors need a hash that is stable across builds.
fn bucket(token: &str) -> usize {
    let hash = token.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    (hash % HASHING_DIM as u64) as usize
}
