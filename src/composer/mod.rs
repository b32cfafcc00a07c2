// src/composer/mod.rs
pub mod email_composer;

pub use email_composer::EmailComposer;
