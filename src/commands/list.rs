//! Article listing command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::mybest::{ArticleList, MybestClient, MybestFetch, Parser};
use anyhow::{Context, Result};
use tracing::info;

/// Which listing a page is taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// The site-wide article listing
    Global,
    /// The article listing of one category slug
    Category(String),
}

/// Fetches one page of an article listing.
pub struct ListCommand {
    config: Config,
    parser: Parser,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        let parser = Parser::new(&config);
        Self { config, parser }
    }

    /// Fetches the page and returns formatted output.
    pub async fn execute(&self, scope: &ListScope, page: u32) -> Result<String> {
        let client = MybestClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, scope, page).await
    }

    /// Fetches the page with a provided client and returns formatted output.
    pub async fn execute_with_client<F: MybestFetch + ?Sized>(
        &self,
        client: &F,
        scope: &ListScope,
        page: u32,
    ) -> Result<String> {
        let list = self.fetch(client, scope, page).await?;
        Ok(Formatter::new(self.config.format).format_list(&list))
    }

    /// Fetches and parses the page. Pages below 1 are treated as page 1.
    pub async fn fetch<F: MybestFetch + ?Sized>(
        &self,
        client: &F,
        scope: &ListScope,
        page: u32,
    ) -> Result<ArticleList> {
        let page = page.max(1);

        let list = match scope {
            ListScope::Global => {
                info!("Listing articles (page {})", page);
                let html = client.listing(page).await?;
                self.parser.parse_listing(&html, page)
            }
            ListScope::Category(slug) => {
                info!("Listing category {} (page {})", slug, page);
                let html = client.category(slug, page).await?;
                self.parser.parse_category_listing(&html, slug, page)
            }
        };

        info!("Found {} articles", list.count());
        Ok(list)
    }
}
