// src/composer/email_composer.rs
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::PipelineError;
use crate::llm::prompts::COLD_EMAIL_PROMPT;
use crate::llm::LanguageModel;
use crate::types::{EmailDraft, JobRecord, SenderProfile};

pub struct EmailComposer {
    model: Arc<dyn LanguageModel>,
}

impl EmailComposer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Draft the email. The six-part structure is only requested from the
    /// model, never checked.
    pub async fn compose(
        &self,
        job: &JobRecord,
        links: &[String],
        sender: &SenderProfile,
    ) -> Result<EmailDraft, PipelineError> {
        let prompt = build_email_prompt(job, links, sender);

        let text = self
            .model
            .complete(&prompt)
            .await
            .map_err(PipelineError::model)?;

        let draft = EmailDraft::new(text.trim());
        info!(
            "Composed email for role '{}' ({} characters)",
            job.role,
            draft.as_str().len()
        );
        Ok(draft)
    }
}

pub fn build_email_prompt(job: &JobRecord, links: &[String], sender: &SenderProfile) -> String {
    let job_description = serde_json::to_string_pretty(job).unwrap_or_else(|_| {
        format!(
            "role: {}\nexperience: {}\nskills: {}\ndescription: {}",
            job.role, job.experience, job.skills, job.description
        )
    });

    let link_list = if links.is_empty() {
        "(no portfolio links available)".to_string()
    } else {
        links
            .iter()
            .map(|link| format!("\n- {}", link))
            .collect::<String>()
    };

    let mut variables = HashMap::new();
    variables.insert("job_description", job_description);
    variables.insert("link_list", link_list);
    variables.insert("name", sender.name.clone());
    variables.insert("job_title", sender.job_title.clone());
    variables.insert("company", sender.company.clone());
    variables.insert("company_description", sender.company_description.clone());
    variables.insert("skills", sender.skills.clone());
    variables.insert("experience", sender.experience.clone());
    variables.insert("interests", sender.interests.clone());

    COLD_EMAIL_PROMPT.render(&variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SenderProfile {
        SenderProfile {
            name: "Garima Govil".to_string(),
            job_title: "Business Development Executive".to_string(),
            skills: "Solution selling".to_string(),
            ..SenderProfile::default()
        }
    }

    #[test]
    fn test_prompt_contains_every_input() {
        let job = JobRecord::new("Data Engineer", "3+ years", "Spark, Airflow", "Own pipelines");
        let links = vec![
            "https://example.com/spark".to_string(),
            "https://example.com/airflow".to_string(),
        ];
        let prompt = build_email_prompt(&job, &links, &sender());

        assert!(prompt.contains("\"role\": \"Data Engineer\""));
        assert!(prompt.contains("- https://example.com/spark"));
        assert!(prompt.contains("- https://example.com/airflow"));
        assert!(prompt.contains("You are Garima Govil, a Business Development Executive at AtliQ."));
        assert!(prompt.contains("Highlight how your skills (Solution selling)"));
        assert!(prompt.contains("1. A catchy subject line"));
        assert!(prompt.contains("6. Professional closing"));
        assert!(!prompt.contains("{{"));
    }

    struct PaddedReply;

    #[async_trait::async_trait]
    impl LanguageModel for PaddedReply {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok("\n\n  Subject: Hello\n\nDear team,  \n".to_string())
        }
    }

    #[tokio::test]
    async fn test_model_output_is_trimmed() {
        let composer = EmailComposer::new(Arc::new(PaddedReply));
        let draft = composer
            .compose(&JobRecord::default(), &[], &sender())
            .await
            .unwrap();
        assert_eq!(draft.as_str(), "Subject: Hello\n\nDear team,");
    }

    #[test]
    fn test_prompt_without_links() {
        let prompt = build_email_prompt(&JobRecord::default(), &[], &sender());
        assert!(prompt.contains("(no portfolio links available)"));
    }
}
