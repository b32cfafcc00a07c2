// src/core/mod.rs
//! Shared infrastructure: configuration, storage, files and prompt rendering

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod template_engine;

pub use config_manager::ConfigManager;
pub use database::Database;
pub use fs_ops::FsOps;
pub use template_engine::PromptTemplate;
