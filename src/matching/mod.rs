// src/matching/mod.rs
pub mod link_matcher;

pub use link_matcher::{LinkMatcher, MATCH_COUNT};
