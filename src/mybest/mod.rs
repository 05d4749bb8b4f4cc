//! my-best.com specific modules: HTTP client, selectors, extractors, and data models.

pub mod affiliate;
pub mod categories;
pub mod client;
pub mod listing;
pub mod merge;
pub mod models;
pub mod parser;
pub mod price;
pub mod selectors;
pub mod structured;
pub mod table;
pub mod text;

pub use affiliate::AffiliateRewriter;
pub use categories::CategoryDiscovery;
pub use client::{MybestClient, MybestFetch, CATEGORY_INDEX_PATHS};
pub use models::{
    ArticleDetail, ArticleList, ArticlePreview, CategoryTile, PageMeta, ProductRecord, SideTable,
    SupplementaryRow,
};
pub use parser::Parser;
pub use price::PriceValue;
