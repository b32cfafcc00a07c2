// src/llm/prompts.rs
//! Prompt templates sent to the language model

use crate::core::PromptTemplate;

/// Placeholder: `page_data`.
pub const EXTRACT_JOB_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"
### SCRAPED TEXT FROM WEBSITE:
{{page_data}}
The scraped text is from the career's page of a website.
Your job is to extract the job postings and return them in JSON format containing
following keys: `role`, `experience`, `skills` and `description`.
Only return valid JSON.
### VALID JSON (NO PREAMBLE):
"#,
);

/// Placeholders: `job_description`, `link_list`, `name`, `job_title`, `company`,
/// `company_description`, `skills`, `experience`, `interests`.
pub const COLD_EMAIL_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"
### JOB DESCRIPTION:
{{job_description}}

### USER INFORMATION:
Name: {{name}}
Job Title: {{job_title}}
Company: {{company}}
Skills: {{skills}}
Experience: {{experience}}
Key Interests: {{interests}}

### INSTRUCTION:
You are {{name}}, a {{job_title}} at {{company}}. {{company_description}}
Your job is to write a cold email to the client regarding the job mentioned above describing your capabilities
in fulfilling their needs based on your skills and experience.

Highlight how your skills ({{skills}}) align with the job requirements.
Mention your relevant experience: {{experience}}
Include your key interests that relate to the position: {{interests}}

Also add the most relevant ones from the following links to showcase your portfolio: {{link_list}}

Create a professional, compelling email with:
1. A catchy subject line
2. A personalized greeting
3. A strong introduction
4. Body that shows alignment between your skills and their needs
5. Call to action
6. Professional closing

Do not provide a preamble.
### EMAIL (NO PREAMBLE):
"#,
);
