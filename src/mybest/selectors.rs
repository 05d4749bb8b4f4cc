//! CSS selectors for my-best.com HTML parsing.
//!
//! All selectors used against my-best.com pages live here.
//! Update this file when the site changes its markup.
//!
//! **Update process**: When extraction comes back empty, capture an HTML
//! sample, update selectors, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the article listing pages (global and category-scoped).
pub mod listing {
    use super::*;

    /// One article card on a listing page.
    pub static CONTENT_ITEM: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div[data-testid='content_list_item']").unwrap());

    /// Article link inside a card.
    pub static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    /// Article title inside a card.
    pub static ITEM_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());

    /// Page-number entries of the pagination control.
    pub static PAGINATION_ITEM: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("nav[role='navigation'] li").unwrap());
}

/// Selectors for article detail pages.
pub mod detail {
    use super::*;

    /// Rows of the ranked comparison table.
    pub static COMPARISON_ROW: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("table[data-testid='comparison-table'] tbody tr").unwrap()
    });

    /// Cells of a comparison row.
    pub static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

    /// Purchase links inside the link cell.
    pub static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

    /// Embedded JSON-LD blocks.
    pub static LD_JSON: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

    /// Column positions inside a comparison row.
    pub const RANK_CELL: usize = 0;
    pub const LINK_CELL: usize = 3;
    pub const POINT_CELL: usize = 4;
}

/// Selectors for the category tile pages.
pub mod categories {
    use super::*;

    /// Candidate category/tag anchors; the href is checked again by pattern.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("a[href*='/categories/'], a[href*='/tags/']").unwrap()
    });

    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

    pub static NOSCRIPT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("noscript").unwrap());
}
