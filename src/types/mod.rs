// src/types/mod.rs
//! Data contracts passed between pipeline stages

pub mod email;
pub mod job;
pub mod profile;

pub use email::{EmailDraft, GeneratedEmail, DRAFT_FILE_NAME};
pub use job::{JobInput, JobRecord};
pub use profile::{SenderProfile, DEFAULT_COMPANY, DEFAULT_COMPANY_DESCRIPTION};
