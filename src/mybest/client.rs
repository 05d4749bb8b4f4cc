//! HTTP client for my-best.com pages using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Pages scanned for category tiles, relative to the site root.
pub const CATEGORY_INDEX_PATHS: [&str; 2] = ["/", "/categories"];

/// Trait for my-best.com page fetching - enables mocking for tests.
#[async_trait]
pub trait MybestFetch: Send + Sync {
    /// Fetches a page of the global article listing.
    async fn listing(&self, page: u32) -> Result<String>;

    /// Fetches an article page by id.
    async fn article(&self, id: &str) -> Result<String>;

    /// Fetches a page of one category's article listing.
    async fn category(&self, slug: &str, page: u32) -> Result<String>;

    /// Fetches one of the [`CATEGORY_INDEX_PATHS`].
    async fn category_index(&self, path: &str) -> Result<String>;
}

/// my-best.com HTTP client with browser impersonation.
pub struct MybestClient {
    client: Client,
    base_url: String,
}

impl MybestClient {
    /// Creates a new client for the configured site.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        let base_url = base_url.unwrap_or_else(|| config.site_url.clone());

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Returns the site root every page URL is built on.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request with browser headers.
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request to {} failed with status: {}", url, status);
        }

        response.text().await.context("Failed to read response body")
    }

    fn listing_url(&self, page: u32) -> String {
        paged(format!("{}/presses", self.base_url), page)
    }

    fn article_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id))
    }

    fn category_url(&self, slug: &str, page: u32) -> String {
        paged(format!("{}/categories/{}", self.base_url, urlencoding::encode(slug)), page)
    }
}

/// Appends `?page=n` for every page after the first.
fn paged(url: String, page: u32) -> String {
    if page > 1 {
        format!("{}?page={}", url, page)
    } else {
        url
    }
}

#[async_trait]
impl MybestFetch for MybestClient {
    async fn listing(&self, page: u32) -> Result<String> {
        info!("Fetching article listing (page {})", page);
        self.get(&self.listing_url(page)).await
    }

    async fn article(&self, id: &str) -> Result<String> {
        info!("Fetching article: {}", id);
        self.get(&self.article_url(id)).await
    }

    async fn category(&self, slug: &str, page: u32) -> Result<String> {
        info!("Fetching category {} (page {})", slug, page);
        self.get(&self.category_url(slug, page)).await
    }

    async fn category_index(&self, path: &str) -> Result<String> {
        info!("Fetching category index: {}", path);
        self.get(&format!("{}{}", self.base_url, path)).await
    }
}
