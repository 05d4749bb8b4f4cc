//! Data models for articles, ranked products, category tiles, and pagination.
//!
//! Field order is the wire order of the JSON responses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ranked product of a comparison article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 1-based position declared in the article's item list
    pub rank: u32,
    pub brand_name: String,
    pub product_name: String,
    /// Formatted price, e.g. "Rp 199.000"
    #[serde(rename = "price")]
    pub price_display: String,
    /// All product images in source order
    pub images: Vec<String>,
    /// First element of `images`, or empty
    #[serde(rename = "image_url")]
    pub primary_image: String,
    /// Highlight text from the comparison table
    #[serde(rename = "point")]
    pub rating_point: String,
    /// Affiliated marketplace link, empty when none was usable
    #[serde(rename = "shopee_link")]
    pub affiliate_link: String,
}

impl ProductRecord {
    /// Sets `images` and derives `primary_image` from it.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.primary_image = images.first().cloned().unwrap_or_default();
        self.images = images;
        self
    }
}

/// A fully extracted comparison article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub category: String,
    pub intro: String,
    /// Ordered by item-list position as declared in the page
    pub products: Vec<ProductRecord>,
}

/// Extra per-product attributes read from the rendered comparison table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryRow {
    pub rank: u32,
    pub point: String,
    pub affiliate_link: String,
}

/// Rank-keyed side table of [`SupplementaryRow`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideTable {
    rows: HashMap<u32, SupplementaryRow>,
}

impl SideTable {
    /// Creates an empty side table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a row under its rank, returning the row it replaced.
    pub fn insert(&mut self, row: SupplementaryRow) -> Option<SupplementaryRow> {
        self.rows.insert(row.rank, row)
    }

    /// Looks up the row for a rank.
    pub fn get(&self, rank: u32) -> Option<&SupplementaryRow> {
        self.rows.get(&rank)
    }

    /// Returns number of ranks present.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows were collected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<SupplementaryRow> for SideTable {
    fn from_iter<I: IntoIterator<Item = SupplementaryRow>>(iter: I) -> Self {
        let mut table = SideTable::new();
        for row in iter {
            table.insert(row);
        }
        table
    }
}

/// An article card on a listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePreview {
    pub title: String,
    pub original_id: String,
    /// Detail endpoint of this service for the article
    pub api_link: String,
    /// Article URL on the source site
    pub source_link: String,
}

/// Pagination metadata for a listing response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    /// 0 when the page count could not be discovered
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page_url: String,
    pub prev_page_url: String,
    pub last_page_url: String,
}

/// A listing response: pagination plus article cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    pub meta: PageMeta,
    pub data: Vec<ArticlePreview>,
}

impl ArticleList {
    /// Returns number of articles.
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no articles were found.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A category tile discovered on the category pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTile {
    pub name: String,
    pub image_url: String,
    /// Numeric category/tag id taken from the tile link
    pub slug: String,
    pub api_link: String,
}
