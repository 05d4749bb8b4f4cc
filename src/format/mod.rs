//! Output formatting for listings, articles and categories (JSON, table).

use crate::config::OutputFormat;
use crate::mybest::{ArticleDetail, ArticleList, CategoryTile};
use serde::Serialize;

/// Formats response models for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats one page of an article listing.
    pub fn format_list(&self, list: &ArticleList) -> String {
        match self.format {
            OutputFormat::Json => json(list, "{}"),
            OutputFormat::Table => self.table_list(list),
        }
    }

    /// Formats an article with its merged products.
    pub fn format_detail(&self, detail: &ArticleDetail) -> String {
        match self.format {
            OutputFormat::Json => json(detail, "{}"),
            OutputFormat::Table => self.table_detail(detail),
        }
    }

    /// Formats discovered category tiles.
    pub fn format_categories(&self, tiles: &[CategoryTile]) -> String {
        match self.format {
            OutputFormat::Json => json(tiles, "[]"),
            OutputFormat::Table => self.table_categories(tiles),
        }
    }

    // Table formatting

    fn table_list(&self, list: &ArticleList) -> String {
        if list.is_empty() {
            return "No articles found.".to_string();
        }

        let id_width = 10;
        let title_width = 60;

        let mut lines = Vec::new();
        lines.push(format!("{:<id_width$}  {}", "ID", "Title"));
        lines.push(format!("{:-<id_width$}  {:-<title_width$}", "", ""));

        for preview in &list.data {
            lines.push(format!(
                "{:<id_width$}  {}",
                preview.original_id,
                truncate(&preview.title, title_width)
            ));
        }

        lines.push(String::new());
        let meta = &list.meta;
        if meta.total_pages > 0 {
            lines.push(format!("Page {} of {}", meta.current_page, meta.total_pages));
        } else {
            lines.push(format!("Page {}", meta.current_page));
        }
        if meta.has_prev {
            lines.push(format!("Prev:  {}", meta.prev_page_url));
        }
        if meta.has_next {
            lines.push(format!("Next:  {}", meta.next_page_url));
        }

        lines.join("\n")
    }

    fn table_detail(&self, detail: &ArticleDetail) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ID:        {}", detail.id));
        lines.push(format!("Title:     {}", detail.title));
        if !detail.category.is_empty() {
            lines.push(format!("Category:  {}", detail.category));
        }
        if !detail.intro.is_empty() {
            lines.push(format!("Intro:     {}", truncate(&detail.intro, 100)));
        }
        lines.push(String::new());

        if detail.products.is_empty() {
            lines.push("No products found.".to_string());
            return lines.join("\n");
        }

        let rank_width = 4;
        let price_width = 14;
        let brand_width = 16;
        let name_width = 40;

        lines.push(format!(
            "{:<rank_width$}  {:<brand_width$}  {:<name_width$}  {:>price_width$}  {}",
            "#", "Brand", "Product", "Price", "Shopee"
        ));
        lines.push(format!(
            "{:-<rank_width$}  {:-<brand_width$}  {:-<name_width$}  {:-<price_width$}  {:-<6}",
            "", "", "", "", ""
        ));

        for product in &detail.products {
            let price = if product.price_display.is_empty() { "N/A" } else { &product.price_display };
            let link = if product.affiliate_link.is_empty() { "-" } else { "yes" };

            lines.push(format!(
                "{:<rank_width$}  {:<brand_width$}  {:<name_width$}  {:>price_width$}  {}",
                product.rank,
                truncate(&product.brand_name, brand_width),
                truncate(&product.product_name, name_width),
                price,
                link
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", detail.products.len()));

        lines.join("\n")
    }

    fn table_categories(&self, tiles: &[CategoryTile]) -> String {
        if tiles.is_empty() {
            return "No categories found.".to_string();
        }

        let slug_width = 8;
        let name_width = 40;

        let mut lines = Vec::new();
        lines.push(format!("{:<slug_width$}  {}", "Slug", "Name"));
        lines.push(format!("{:-<slug_width$}  {:-<name_width$}", "", ""));

        for tile in tiles {
            lines.push(format!("{:<slug_width$}  {}", tile.slug, truncate(&tile.name, name_width)));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} categories", tiles.len()));

        lines.join("\n")
    }
}

fn json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

/// Shortens `text` to at most `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
