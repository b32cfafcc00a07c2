// src/scraping/page_fetcher.rs
use super::PageFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Elements whose text never belongs to the readable page.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

pub struct WebPageFetcher {
    client: Client,
}

impl WebPageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Readable text of an HTML document: `<body>` when present, else the whole tree.
    pub fn extract_text(html: &str) -> String {
        let document = Html::parse_document(html);

        let root = Selector::parse("body")
            .ok()
            .and_then(|selector| document.select(&selector).next());

        let root = match root {
            Some(body) => body,
            None => {
                warn!("Page has no <body>, reading the whole document");
                document.root_element()
            }
        };

        let chunks: Vec<&str> = root
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map(|element| SKIPPED_ELEMENTS.contains(&element.name()))
                        .unwrap_or(false)
                });
                if hidden {
                    None
                } else {
                    Some(&**text)
                }
            })
            .collect();

        Self::clean_text(&chunks.join("\n"))
    }

    /// Keep line structure but drop blank lines and collapse runs of spaces.
    fn clean_text(text: &str) -> String {
        text.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl PageFetcher for WebPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        info!("Fetching job page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let text = Self::extract_text(&html);
        if text.is_empty() {
            anyhow::bail!("Page at {} has no readable text", url);
        }

        info!("Extracted {} characters of page text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_skips_scripts_and_styles() {
        let html = r#"
            <html>
              <head><title>Careers</title><style>.x { color: red; }</style></head>
              <body>
                <h1>Software   Engineer I</h1>
                <script>window.track = 1;</script>
                <div class="description">
                  <p>Build services in Python and Java.</p>
                  <noscript>Enable JavaScript</noscript>
                </div>
              </body>
            </html>
        "#;

        let text = WebPageFetcher::extract_text(html);
        assert_eq!(
            text,
            "Software Engineer I\nBuild services in Python and Java."
        );
    }

    #[test]
    fn test_clean_text_drops_blank_lines() {
        let cleaned = WebPageFetcher::clean_text("  a   b \n\n   \n c\t d ");
        assert_eq!(cleaned, "a b\nc d");
    }

    #[test]
    fn test_extract_text_empty_page() {
        assert_eq!(WebPageFetcher::extract_text("<html><body></body></html>"), "");
    }
}
