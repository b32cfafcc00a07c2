// src/types/profile.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_COMPANY: &str = "AtliQ";
pub const DEFAULT_COMPANY_DESCRIPTION: &str = "An AI & Software Consulting company dedicated to facilitating the seamless integration of business processes through automated tools. Over our experience, we have empowered numerous enterprises with tailored solutions, fostering scalability, process optimization, cost reduction, and heightened overall efficiency.";

/// Operator identity and qualifications used to personalize the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderProfile {
    pub name: String,
    pub job_title: String,
    pub company: String,
    pub company_description: String,
    pub skills: String,
    pub experience: String,
    pub interests: String,
}

impl Default for SenderProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            job_title: String::new(),
            company: DEFAULT_COMPANY.to_string(),
            company_description: DEFAULT_COMPANY_DESCRIPTION.to_string(),
            skills: String::new(),
            experience: String::new(),
            interests: String::new(),
        }
    }
}

impl SenderProfile {
    /// Names the first required field that is blank, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.job_title.trim().is_empty() {
            Some("job_title")
        } else {
            None
        }
    }

    /// Load a profile from a TOML file; absent keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sender profile: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse sender profile: {}", path.display()))
    }
}
