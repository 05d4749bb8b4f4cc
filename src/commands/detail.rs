//! Article detail command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::mybest::{ArticleDetail, MybestClient, MybestFetch, Parser};
use anyhow::{Context, Result};
use tracing::info;

/// Fetches an article and merges its product comparison.
pub struct DetailCommand {
    config: Config,
    parser: Parser,
}

impl DetailCommand {
    /// Creates a new detail command.
    pub fn new(config: Config) -> Self {
        let parser = Parser::new(&config);
        Self { config, parser }
    }

    /// Fetches the article and returns formatted output.
    pub async fn execute(&self, id: &str) -> Result<String> {
        let client = MybestClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, id).await
    }

    /// Fetches the article with a provided client and returns formatted output.
    pub async fn execute_with_client<F: MybestFetch + ?Sized>(
        &self,
        client: &F,
        id: &str,
    ) -> Result<String> {
        let detail = self.fetch(client, id).await?;
        Ok(Formatter::new(self.config.format).format_detail(&detail))
    }

    /// Fetches and parses the article.
    pub async fn fetch<F: MybestFetch + ?Sized>(&self, client: &F, id: &str) -> Result<ArticleDetail> {
        let id = id.trim();
        if id.is_empty() {
            anyhow::bail!("Article id must not be empty");
        }

        info!("Looking up article: {}", id);

        let html = client.article(id).await?;
        let detail = self.parser.parse_detail(&html, id);

        info!("Article {} has {} products", id, detail.products.len());
        Ok(detail)
    }
}
