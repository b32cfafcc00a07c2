// src/types/job.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured job posting fields produced by the extractor (or typed in by hand).
///
/// Values are best-effort: the model may leave a field blank or invent content.
/// All four keys must be present in the model output, but each value is decoded
/// leniently since models often answer `skills` with a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(deserialize_with = "lenient_text")]
    pub experience: String,
    #[serde(deserialize_with = "lenient_text")]
    pub skills: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
}

impl JobRecord {
    pub fn new(
        role: impl Into<String>,
        experience: impl Into<String>,
        skills: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            experience: experience.into(),
            skills: skills.into(),
            description: description.into(),
        }
    }
}

/// Where the job record for a pipeline run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobInput {
    /// Scrape the posting at this URL and extract the fields with the model.
    Url(String),
    /// Use these fields verbatim; fetching and extraction are skipped.
    Manual(JobRecord),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| format!("{}: {}", key, value_to_text(v)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}
