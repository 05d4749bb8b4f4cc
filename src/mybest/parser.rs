//! Page-level parsing: turns fetched HTML into response models.

use crate::config::Config;
use crate::mybest::affiliate::AffiliateRewriter;
use crate::mybest::categories::CategoryDiscovery;
use crate::mybest::listing::extract_listing;
use crate::mybest::merge::merge;
use crate::mybest::models::{ArticleDetail, ArticleList};
use crate::mybest::structured::extract_structured;
use crate::mybest::table::extract_side_table;
use crate::pagination::{paginate, PageUrlTemplate};
use scraper::Html;
use tracing::debug;

/// Parser for my-best.com pages.
///
/// Parsing never fails: missing or malformed page parts become empty values.
#[derive(Debug, Clone)]
pub struct Parser {
    rewriter: AffiliateRewriter,
    site_url: String,
    api_base: String,
    asset_host_token: String,
}

impl Parser {
    /// Creates a parser from the configured site, API base and partner settings.
    pub fn new(config: &Config) -> Self {
        Self {
            rewriter: AffiliateRewriter::from_config(config),
            site_url: config.site_url.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            asset_host_token: config.asset_host_token.clone(),
        }
    }

    /// Parses an article page into its merged product comparison.
    pub fn parse_detail(&self, html: &str, id: &str) -> ArticleDetail {
        let document = Html::parse_document(html);

        let side = extract_side_table(&document, &self.rewriter);
        let structured = extract_structured(&document);
        let products = merge(structured.products, &side);

        debug!("Article {}: {} products, {} table rows", id, products.len(), side.len());

        ArticleDetail {
            id: id.to_string(),
            title: structured.title,
            category: structured.category,
            intro: structured.intro,
            products,
        }
    }

    /// Parses a page of the global article listing.
    pub fn parse_listing(&self, html: &str, page: u32) -> ArticleList {
        self.listing_with(html, page, &PageUrlTemplate::Path(self.api_base.clone()))
    }

    /// Parses a page of a category's article listing.
    pub fn parse_category_listing(&self, html: &str, slug: &str, page: u32) -> ArticleList {
        let base = format!("{}/category/{}", self.api_base, slug);
        self.listing_with(html, page, &PageUrlTemplate::Query(base))
    }

    fn listing_with(&self, html: &str, page: u32, template: &PageUrlTemplate) -> ArticleList {
        let document = Html::parse_document(html);
        let listing = extract_listing(&document, &self.site_url, &self.api_base);

        ArticleList { meta: paginate(page, listing.max_page, template), data: listing.previews }
    }

    /// Starts a category discovery run over one or more index pages.
    pub fn category_discovery(&self) -> CategoryDiscovery {
        CategoryDiscovery::new(self.api_base.clone(), self.asset_host_token.clone())
    }
}
