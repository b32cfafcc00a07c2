//! Cold email generation: scrape a job posting, extract its fields with an LLM,
//! match portfolio links from a local vector store and draft an outreach email.

pub mod cli;
pub mod composer;
pub mod core;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod matching;
pub mod pipeline;
pub mod portfolio;
pub mod scraping;
pub mod session;
pub mod types;
pub mod web;

pub use error::PipelineError;
pub use pipeline::{EmailGenerator, EmailPipeline};
pub use session::{Session, SessionPhase};
pub use types::{EmailDraft, GeneratedEmail, JobInput, JobRecord, SenderProfile};
pub use web::start_web_server;

/// Forwards to the matching `tracing` macro; keeps call sites uniform.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}
