//! Article cards and page count from listing pages.

use crate::mybest::models::ArticlePreview;
use crate::mybest::selectors::listing;
use crate::mybest::text::{clean_text, clean_text_opt};
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

/// What a listing page yields before pagination is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub previews: Vec<ArticlePreview>,
    /// Largest page number shown in the pagination control, 0 if none
    pub max_page: u32,
}

/// Extracts article cards, deduplicated by id (first occurrence wins).
pub fn extract_listing(document: &Html, site_url: &str, api_base: &str) -> ListingPage {
    let site = Url::parse(site_url).ok();
    let mut seen = HashSet::new();
    let mut previews = Vec::new();

    for card in document.select(&listing::CONTENT_ITEM) {
        let link = card
            .select(&listing::ITEM_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();

        let id = article_id(link);
        if id.is_empty() || !seen.insert(id.to_string()) {
            trace!("Skipping card with empty or repeated id: {:?}", link);
            continue;
        }

        let source_link = site
            .as_ref()
            .and_then(|base| base.join(link).ok())
            .map(String::from)
            .unwrap_or_else(|| link.to_string());

        previews.push(ArticlePreview {
            title: clean_text_opt(card.select(&listing::ITEM_TITLE).next()),
            original_id: id.to_string(),
            api_link: format!("{}/detail/{}", api_base, id),
            source_link,
        });
    }

    let max_page = max_page(document);
    debug!("Parsed {} articles (max page {})", previews.len(), max_page);

    ListingPage { previews, max_page }
}

/// Returns the last path segment of an article link, ignoring query and fragment.
pub fn article_id(link: &str) -> &str {
    let path = link.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Largest integer label in the pagination control, or 0.
fn max_page(document: &Html) -> u32 {
    document
        .select(&listing::PAGINATION_ITEM)
        .filter_map(|li| clean_text(li).parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}
