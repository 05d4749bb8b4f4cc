//! Category discovery command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::mybest::{CategoryTile, MybestClient, MybestFetch, Parser, CATEGORY_INDEX_PATHS};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Discovers category tiles across the category index pages.
pub struct CategoriesCommand {
    config: Config,
    parser: Parser,
}

impl CategoriesCommand {
    /// Creates a new categories command.
    pub fn new(config: Config) -> Self {
        let parser = Parser::new(&config);
        Self { config, parser }
    }

    /// Discovers categories and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let client = MybestClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client).await
    }

    /// Discovers categories with a provided client and returns formatted output.
    pub async fn execute_with_client<F: MybestFetch + ?Sized>(&self, client: &F) -> Result<String> {
        let tiles = self.fetch(client).await?;
        Ok(Formatter::new(self.config.format).format_categories(&tiles))
    }

    /// Scans every index page into one deduplicated tile list.
    ///
    /// A page that fails to load is skipped; the call fails only when none load.
    pub async fn fetch<F: MybestFetch + ?Sized>(&self, client: &F) -> Result<Vec<CategoryTile>> {
        info!("Discovering categories");

        let mut discovery = self.parser.category_discovery();
        let mut last_error = None;
        let mut loaded = 0;

        for path in CATEGORY_INDEX_PATHS {
            match client.category_index(path).await {
                Ok(html) => {
                    loaded += 1;
                    discovery.scan(&html);
                }
                Err(e) => {
                    warn!("Failed to fetch category index {}: {}", path, e);
                    last_error = Some(e);
                }
            }
        }

        if loaded == 0 {
            if let Some(e) = last_error {
                return Err(e.context("Failed to fetch any category index page"));
            }
        }

        let tiles = discovery.into_tiles();
        info!("Found {} categories", tiles.len());
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mock::MockFetch;
    use crate::config::OutputFormat;

    const HOME: &str = r#"<html><body>
        <a href="/categories/101"><img src="https://img.my-best.com/101.jpg"><div>PERALATAN DAPUR</div></a>
        <a href="/presses">Artikel</a>
    </body></html>"#;

    const INDEX: &str = r#"<html><body>
        <a href="/categories/101"><div>Dapur duplikat</div></a>
        <a href="/tags/202"><div>Elektronik</div></a>
    </body></html>"#;

    #[tokio::test]
    async fn test_categories_merges_index_pages() {
        let client =
            MockFetch::new().with_page("index:/", HOME).with_page("index:/categories", INDEX);
        let cmd = CategoriesCommand::new(Config::default());

        let tiles = cmd.fetch(&client).await.unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].name, "Peralatan Dapur");
        assert_eq!(tiles[0].image_url, "https://img.my-best.com/101.jpg");
        assert_eq!(tiles[1].slug, "202");
        assert_eq!(tiles[1].api_link, "http://localhost:8080/api/category/202");
        assert_eq!(client.requests(), vec!["index:/", "index:/categories"]);
    }

    #[tokio::test]
    async fn test_categories_tolerates_one_failed_page() {
        let client = MockFetch::new().with_page("index:/categories", INDEX);
        let cmd = CategoriesCommand::new(Config::default());

        let tiles = cmd.fetch(&client).await.unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].name, "Dapur Duplikat");
    }

    #[tokio::test]
    async fn test_categories_all_pages_failed() {
        let client = MockFetch::failing();
        let cmd = CategoriesCommand::new(Config::default());

        let result = cmd.fetch(&client).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to fetch any category index"));
    }

    #[tokio::test]
    async fn test_categories_table_output() {
        let client =
            MockFetch::new().with_page("index:/", HOME).with_page("index:/categories", INDEX);
        let cmd = CategoriesCommand::new(Config { format: OutputFormat::Table, ..Config::default() });

        let output = cmd.execute_with_client(&client).await.unwrap();
        assert!(output.contains("Peralatan Dapur"));
        assert!(output.contains("Total: 2 categories"));
    }
}
