//! Wikipedia REST client
//!
//! Title search followed by a page summary fetch, against the Wikipedia edition that
//! matches the caller's locale.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Pick the Wikipedia edition from the caller's locale
//! - 1.0.0: Initial release (English only)

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::features::gate::{NormalizedRequest, Payload, Upstream};

const DEFAULT_EDITION: &str = "en";

/// Summary of a Wikipedia article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl Payload for LookupResult {
    fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.summary.trim().is_empty()
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pages: Vec<SearchPage>,
}

#[derive(Deserialize)]
struct SearchPage {
    key: String,
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Deserialize)]
struct ContentUrls {
    desktop: PageUrl,
}

#[derive(Deserialize)]
struct PageUrl {
    page: String,
}

#[derive(Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
}

impl WikipediaClient {
    /// No overall request timeout is set here: the gate bounds every call.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent("TurnstileBot/0.4 (Discord lookup bot)")
            .build()?;
        Ok(Self { client })
    }

    /// Find the best matching article for `query` and return its summary.
    ///
    /// An empty search yields `LookupResult::default()`.
    pub async fn lookup(&self, query: &str, locale: &str) -> Result<LookupResult> {
        let edition = wiki_edition(locale);
        let Some(key) = self.search(&edition, query).await? else {
            debug!("No {edition}.wikipedia.org results for '{query}'");
            return Ok(LookupResult::default());
        };
        self.summary(&edition, &key).await
    }

    async fn search(&self, edition: &str, query: &str) -> Result<Option<String>> {
        let url = format!("https://{edition}.wikipedia.org/w/rest.php/v1/search/title");
        let response = self
            .client
            .get(url)
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| anyhow!("Wikipedia search failed: {e}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("Wikipedia search returned HTTP {}", response.status()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.pages.into_iter().next().map(|page| page.key))
    }

    async fn summary(&self, edition: &str, key: &str) -> Result<LookupResult> {
        let url = summary_url(edition, key)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Wikipedia summary request failed: {e}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LookupResult::default());
        }
        if !response.status().is_success() {
            return Err(anyhow!("Wikipedia summary returned HTTP {}", response.status()));
        }

        let body: SummaryResponse = response.json().await?;
        Ok(LookupResult {
            title: body.title,
            summary: body.extract,
            url: body
                .content_urls
                .map(|urls| urls.desktop.page)
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Upstream for WikipediaClient {
    type Output = LookupResult;

    async fn call(&self, request: NormalizedRequest) -> Result<LookupResult> {
        self.lookup(&request.text, &request.lang).await
    }
}

/// Wikipedia edition subdomain for a locale (`en-us` → `en`, `pt_BR` → `pt`)
pub fn wiki_edition(locale: &str) -> String {
    let primary = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    if (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_lowercase()) {
        primary
    } else {
        DEFAULT_EDITION.to_string()
    }
}

fn summary_url(edition: &str, key: &str) -> Result<Url> {
    let mut url = Url::parse(&format!(
        "https://{edition}.wikipedia.org/api/rest_v1/page/summary"
    ))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Wikipedia URL cannot carry a path"))?
        .push(key);
    Ok(url)
}
