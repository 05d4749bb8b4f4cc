//! mybest-scraper - product comparison scraper and JSON API for my-best.com
//!
//! Fetches article listings, category tiles and ranked product comparisons,
//! merging each article's structured data with its rendered comparison table.

pub mod commands;
pub mod config;
pub mod format;
pub mod mybest;
pub mod pagination;
pub mod server;

pub use config::Config;
pub use mybest::{ArticleDetail, ArticleList, ArticlePreview, CategoryTile, PageMeta, ProductRecord};
