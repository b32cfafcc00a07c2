// src/extraction/mod.rs
pub mod job_extractor;

pub use job_extractor::{parse_job_record, JobExtractor};
