// src/extraction/job_extractor.rs
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::llm::prompts::EXTRACT_JOB_PROMPT;
use crate::llm::{strip_json_fences, LanguageModel};
use crate::types::JobRecord;

/// Page text beyond this many characters is cut before prompting.
const MAX_PAGE_CHARS: usize = 24_000;

pub struct JobExtractor {
    model: Arc<dyn LanguageModel>,
}

impl JobExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Ask the model for the posting's fields. Malformed output is reported,
    /// never retried.
    pub async fn extract(&self, page_text: &str) -> Result<JobRecord, PipelineError> {
        let page_data = truncate_chars(page_text, MAX_PAGE_CHARS);
        if page_data.len() < page_text.len() {
            warn!(
                "Page text truncated from {} to {} bytes before extraction",
                page_text.len(),
                page_data.len()
            );
        }

        let mut variables = HashMap::new();
        variables.insert("page_data", page_data.to_string());
        let prompt = EXTRACT_JOB_PROMPT.render(&variables);

        let raw = self
            .model
            .complete(&prompt)
            .await
            .map_err(PipelineError::model)?;

        let job = parse_job_record(&raw)?;
        info!("Extracted job details for role: {}", job.role);
        Ok(job)
    }
}

/// Decode model output into a `JobRecord`.
///
/// Accepts a bare object, a fenced object, an array of postings (first one
/// wins) or an object wrapping such an array under a single key.
pub fn parse_job_record(raw: &str) -> Result<JobRecord, PipelineError> {
    let fail = |reason: String| PipelineError::Extraction {
        reason,
        raw_output: raw.to_string(),
    };

    let value: Value = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| fail(format!("model output is not valid JSON ({})", e)))?;

    let posting = first_posting(value).ok_or_else(|| fail("no job posting object found".to_string()))?;

    serde_json::from_value(posting).map_err(|e| fail(e.to_string()))
}

fn first_posting(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => items.into_iter().find(Value::is_object),
        Value::Object(map) => {
            if map.contains_key("role") || map.len() != 1 {
                return Some(Value::Object(map));
            }
            match map.into_iter().next() {
                Some((_, inner @ Value::Array(_))) => first_posting(inner),
                Some((_, inner @ Value::Object(_))) => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
