use std::path::PathBuf;
use std::time::Duration;

use adlens_core::error::{DataError, Result};
use adlens_core::message::Message;
use adlens_core::model::{CallOptions, ChatModel};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::types::Platform;

/// Maximum corpus length, in characters, embedded into a cohort prompt.
pub const MAX_CORPUS_CHARS: usize = 30_000;

/// Sentinel URL that forces the local fixture path.
pub const DEMO_URL: &str = "demo";

const SCRAPE_TIMEOUT: Duration = Duration::from_secs(5);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Clip a corpus to at most [`MAX_CORPUS_CHARS`] characters.
pub fn clip_corpus(text: &str) -> &str {
    match text.char_indices().nth(MAX_CORPUS_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Produces the raw comment corpus for a pipeline run: a local fixture for
/// demo runs, or a scrape-then-synthesize path when a post URL is given.
#[derive(Debug, Clone)]
pub struct CorpusResolver {
    fixture_dir: PathBuf,
    http: reqwest::Client,
    scrape_timeout: Duration,
}

impl CorpusResolver {
    pub fn new(fixture_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixture_dir: fixture_dir.into(),
            http: reqwest::Client::new(),
            scrape_timeout: SCRAPE_TIMEOUT,
        }
    }

    /// Shorten the scrape timeout (tests use a local mock with a delay).
    pub fn with_scrape_timeout(mut self, timeout: Duration) -> Self {
        self.scrape_timeout = timeout;
        self
    }

    /// Resolve the corpus for this run. Only a missing local fixture is a
    /// hard error; every failure on the URL path degrades to a synthesized
    /// or empty corpus.
    pub async fn resolve(
        &self,
        gateway: &dyn ChatModel,
        platform: Platform,
        url: Option<&str>,
    ) -> Result<String> {
        match url {
            Some(u) if u != DEMO_URL => {
                info!(url = u, "resolving corpus from URL");
                let page_context = self.scrape_page_context(u).await.unwrap_or_default();
                Ok(self.synthesize_comments(gateway, platform, u, &page_context).await)
            }
            _ => self.load_fixture(platform),
        }
    }

    /// Read the platform's local comment fixture.
    pub fn load_fixture(&self, platform: Platform) -> Result<String> {
        let name = platform.fixture_file();
        let path = self.fixture_dir.join(name);
        debug!(path = %path.display(), "loading local comment fixture");
        std::fs::read_to_string(&path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "comment fixture missing");
            DataError::FixtureNotFound(name.to_string()).into()
        })
    }

    /// Best-effort scrape of page title and meta description. Any failure
    /// (non-200, timeout, connect error) yields `None`.
    pub async fn scrape_page_context(&self, url: &str) -> Option<String> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(self.scrape_timeout)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(url, status = %r.status(), "scrape returned non-success status");
                return None;
            }
            Err(e) => {
                warn!(url, error = %e, "direct scraping failed, proceeding with simulation only");
                return None;
            }
        };

        let html = response.text().await.ok()?;
        let title = extract_title(&html);
        let description = extract_meta_description(&html);
        if title.is_empty() && description.is_empty() {
            return None;
        }
        Some(format!("Page Title: {title}\nDescription: {description}"))
    }

    /// Ask the gateway to invent a plausible comment set for the URL. A
    /// gateway failure degrades to an empty list literal.
    pub async fn synthesize_comments(
        &self,
        gateway: &dyn ChatModel,
        platform: Platform,
        url: &str,
        page_context: &str,
    ) -> String {
        let prompt = format!(
            r#"You are a Social Media Simulator. The user provided this URL: {url}
Context extracted: {page_context}

Please generate a JSON dataset of 20 realistic comments that would likely appear on this post.
Include a mix of ages (Youth/Adult), sentiments, and styles appropriate for {platform}.

Format:
[
    {{"user": "User1", "comment": "...", "age_group": "18-30"}},
    {{"user": "User2", "comment": "...", "age_group": "30-50"}}
]
Return ONLY raw JSON."#
        );

        match gateway
            .generate(&[Message::user(prompt)], &CallOptions::default())
            .await
        {
            Ok(result) => {
                info!(url, "synthetic comments generated");
                result.message.content()
            }
            Err(e) => {
                warn!(url, error = %e, "comment synthesis failed, using empty corpus");
                "[]".to_string()
            }
        }
    }
}

fn extract_title(html: &str) -> String {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex");
    let Some(cap) = re.captures(html) else {
        return String::new();
    };
    clean_text(cap.get(1).map_or("", |m| m.as_str()))
}

fn extract_meta_description(html: &str) -> String {
    let re = Regex::new(
        r#"(?is)<meta[^>]+name\s*=\s*["']description["'][^>]+content\s*=\s*["'](.*?)["'][^>]*>"#,
    )
    .expect("valid meta description regex");

    if let Some(cap) = re.captures(html) {
        return clean_text(cap.get(1).map_or("", |m| m.as_str()));
    }

    let re_swapped = Regex::new(
        r#"(?is)<meta[^>]+content\s*=\s*["'](.*?)["'][^>]+name\s*=\s*["']description["'][^>]*>"#,
    )
    .expect("valid meta description regex");
    let Some(cap) = re_swapped.captures(html) else {
        return String::new();
    };
    clean_text(cap.get(1).map_or("", |m| m.as_str()))
}

fn clean_text(input: &str) -> String {
    let tags = Regex::new(r"(?is)<[^>]+>").expect("valid tags regex");
    let no_tags = tags.replace_all(input, " ");
    no_tags
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
