// src/types/email.rs
use serde::{Deserialize, Serialize};

use super::job::JobRecord;

/// File name offered when a draft is downloaded or saved.
pub const DRAFT_FILE_NAME: &str = "cold_email.txt";

/// Generated email text. The subject line lives inside the body; nothing here
/// parses or checks the structure the model was asked to follow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailDraft(String);

impl EmailDraft {
    /// Stored verbatim; operator edits keep their whitespace.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub job: JobRecord,
    pub links: Vec<String>,
    pub draft: EmailDraft,
}
