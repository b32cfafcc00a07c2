// src/error.rs
use thiserror::Error;

/// Failures a pipeline run can end with.
///
/// Collaborators return `anyhow::Error`; the stage that called them decides
/// which variant the failure belongs to and flattens the cause chain into text.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Please provide your name and job title (missing: {field})")]
    Validation { field: &'static str },

    #[error("Failed to fetch job page {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to parse job details from model output: {reason}")]
    Extraction { reason: String, raw_output: String },

    #[error("Language model request failed: {0}")]
    Model(String),

    #[error("Portfolio store error: {0}")]
    Store(String),
}

impl PipelineError {
    pub fn fetch(url: &str, err: anyhow::Error) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub fn model(err: anyhow::Error) -> Self {
        Self::Model(format!("{:#}", err))
    }

    pub fn store(err: anyhow::Error) -> Self {
        Self::Store(format!("{:#}", err))
    }

    /// Short machine-readable code used by the web surface.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Fetch { .. } => "SCRAPING_ERROR",
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Model(_) => "MODEL_ERROR",
            Self::Store(_) => "PORTFOLIO_ERROR",
        }
    }
}
