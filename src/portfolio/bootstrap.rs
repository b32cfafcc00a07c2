// src/portfolio/bootstrap.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::{PortfolioEntry, PortfolioStore};
use crate::app_log;

const TECH_STACK_COLUMN: &str = "Techstack";
const LINKS_COLUMN: &str = "Links";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub loaded: usize,
    pub skipped: usize,
    pub already_populated: bool,
}

/// Seed an empty store from the CSV. A populated store is left untouched and
/// the file is not even opened.
///
/// Rows are added one at a time, so an interrupted load leaves a partially
/// populated store that later runs will treat as complete.
pub async fn bootstrap_if_empty(store: &dyn PortfolioStore, csv_path: &Path) -> Result<BootstrapReport> {
    let existing = store.count().await.context("Failed to count portfolio entries")?;
    if existing > 0 {
        app_log!(debug, "Portfolio store already holds {} entries", existing);
        return Ok(BootstrapReport {
            already_populated: true,
            ..BootstrapReport::default()
        });
    }

    app_log!(info, "Portfolio store is empty, loading {}", csv_path.display());
    let content = tokio::fs::read_to_string(csv_path)
        .await
        .with_context(|| format!("Failed to read portfolio CSV: {}", csv_path.display()))?;

    let (entries, skipped) = load_portfolio_csv(&content)?;

    for entry in &entries {
        store
            .add(std::slice::from_ref(entry))
            .await
            .with_context(|| format!("Failed to add portfolio entry for {}", entry.link))?;
    }

    app_log!(
        info,
        "Portfolio bootstrap finished: {} loaded, {} skipped",
        entries.len(),
        skipped
    );

    Ok(BootstrapReport {
        loaded: entries.len(),
        skipped,
        already_populated: false,
    })
}

/// Parse CSV content with `Techstack` and `Links` headers into fresh entries.
/// Returns the entries and the number of rows skipped for blank cells.
pub fn load_portfolio_csv(content: &str) -> Result<(Vec<PortfolioEntry>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read CSV headers")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| anyhow::anyhow!("Portfolio CSV is missing the '{}' column", name))
    };
    let stack_idx = column(TECH_STACK_COLUMN)?;
    let link_idx = column(LINKS_COLUMN)?;

    let mut entries = Vec::new();
    let mut skipped = 0;

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV row {}", row + 2))?;
        let tech_stack = record.get(stack_idx).unwrap_or("");
        let link = record.get(link_idx).unwrap_or("");

        if tech_stack.is_empty() || link.is_empty() {
            app_log!(warn, "Skipping CSV row {}: empty tech stack or link", row + 2);
            skipped += 1;
            continue;
        }

        entries.push(PortfolioEntry::new(tech_stack, link));
    }

    Ok((entries, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_rows() {
        let csv = "Techstack,Links\n\"React, Node.js, MongoDB\",https://example.com/react-portfolio\nPython,https://example.com/python\n";
        let (entries, skipped) = load_portfolio_csv(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tech_stack, "React, Node.js, MongoDB");
        assert_eq!(entries[1].link, "https://example.com/python");
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_columns_found_by_name_and_blank_rows_skipped() {
        let csv = "\u{feff}Links,Techstack\nhttps://a.example,Go\n,Rust\nhttps://c.example,\n";
        let (entries, skipped) = load_portfolio_csv(csv).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tech_stack, "Go");
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = load_portfolio_csv("Stack,Url\nGo,https://a\n").unwrap_err();
        assert!(err.to_string().contains("Techstack"));
    }
}
