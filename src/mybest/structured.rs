//! JSON-LD extraction: article metadata, breadcrumb category, and the ranked item list.
//!
//! Blocks are recognised by sniffing their text rather than validating a
//! schema, since the page carries unrelated JSON-LD as well. Blocks that fail
//! to decode are skipped without affecting the rest of the page.

use crate::mybest::models::ProductRecord;
use crate::mybest::price::PriceValue;
use crate::mybest::selectors::detail;
use crate::mybest::text::title_case;
use scraper::Html;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, trace, warn};

const BREADCRUMB_MARKER: &str = "BreadcrumbList";
const ARTICLE_MARKER: &str = "\"Article\"";
const ITEM_LIST_MARKER: &str = "mainEntity";
const ITEM_LIST_TYPE: &str = "ItemList";

/// Everything the structured data contributes to an article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredArticle {
    pub title: String,
    pub intro: String,
    pub category: String,
    /// Primary records; `rating_point` and `affiliate_link` are left empty.
    pub products: Vec<ProductRecord>,
}

/// A JSON-LD value that may be given as a single item or as an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn flatten<T>(value: Option<OneOrMany<T>>) -> Vec<T> {
    value.map(OneOrMany::into_vec).unwrap_or_default()
}

/// Decodes an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct BreadcrumbBlock {
    #[serde(rename = "itemListElement", default, deserialize_with = "null_as_default")]
    item_list_element: Vec<BreadcrumbEntry>,
}

#[derive(Debug, Deserialize)]
struct BreadcrumbEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ArticleBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    headline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(rename = "mainEntity", default)]
    main_entity: Option<OneOrMany<MainEntity>>,
}

#[derive(Debug, Deserialize)]
struct MainEntity {
    #[serde(rename = "@type", default, deserialize_with = "null_as_default")]
    kind: String,
    #[serde(rename = "itemListElement", default, deserialize_with = "null_as_default")]
    item_list_element: Vec<ListElement>,
}

#[derive(Debug, Deserialize)]
struct ListElement {
    #[serde(default, deserialize_with = "null_as_default")]
    position: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    item: ListedProduct,
}

#[derive(Debug, Default, Deserialize)]
struct ListedProduct {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default)]
    image: Option<OneOrMany<String>>,
    #[serde(default)]
    brand: Option<Brand>,
    #[serde(default)]
    offers: Option<OneOrMany<Offer>>,
}

#[derive(Debug, Default, Deserialize)]
struct Brand {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Offer {
    #[serde(rename = "lowPrice", default)]
    low_price: PriceValue,
}

/// Reads every JSON-LD block of the page into a [`StructuredArticle`].
///
/// Later matching blocks overwrite title, intro and category; products from
/// every matching item list are appended in the order they are declared.
pub fn extract_structured(document: &Html) -> StructuredArticle {
    let mut article = StructuredArticle::default();

    for script in document.select(&detail::LD_JSON) {
        let content = script.text().collect::<String>();
        for block in ld_blocks(&content) {
            apply_block(&mut article, block);
        }
    }

    debug!(
        "Structured data: title={:?} category={:?} products={}",
        article.title,
        article.category,
        article.products.len()
    );
    article
}

/// Splits a script body into its JSON-LD objects. Invalid JSON yields none.
fn ld_blocks(content: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(items)) => items,
        Ok(value) => vec![value],
        Err(e) => {
            warn!("Skipping malformed JSON-LD block: {}", e);
            Vec::new()
        }
    }
}

fn apply_block(article: &mut StructuredArticle, block: Value) {
    let raw = block.to_string();

    if raw.contains(BREADCRUMB_MARKER) {
        match serde_json::from_value::<BreadcrumbBlock>(block.clone()) {
            Ok(breadcrumb) => {
                if let Some(entry) = breadcrumb.item_list_element.get(1) {
                    article.category = title_case(&entry.name.to_lowercase());
                }
            }
            Err(e) => warn!("Skipping undecodable breadcrumb block: {}", e),
        }
    }

    if raw.contains(ARTICLE_MARKER) && raw.contains(ITEM_LIST_MARKER) {
        match serde_json::from_value::<ArticleBlock>(block) {
            Ok(block) => {
                article.title = block.headline;
                article.intro = block.description;
                for entity in flatten(block.main_entity) {
                    if entity.kind != ITEM_LIST_TYPE {
                        continue;
                    }
                    article.products.extend(entity.item_list_element.into_iter().map(product_record));
                }
            }
            Err(e) => warn!("Skipping undecodable article block: {}", e),
        }
    }
}

fn product_record(element: ListElement) -> ProductRecord {
    let item = element.item;
    let brand_name = item.brand.map(|b| b.name).unwrap_or_default();
    let price_display = flatten(item.offers)
        .into_iter()
        .next()
        .map(|offer| offer.low_price.to_display())
        .unwrap_or_default();

    let record = ProductRecord {
        rank: element.position,
        product_name: product_name(&item.name, &brand_name),
        brand_name,
        price_display,
        ..ProductRecord::default()
    }
    .with_images(flatten(item.image));

    trace!("Item {}: {} / {}", record.rank, record.brand_name, record.product_name);
    record
}

/// Derives the display name of a product from its raw JSON-LD name.
///
/// A multi-line name carries the brand label on its first line, so the second
/// line is the product name. Otherwise the brand is removed as a prefix.
pub fn product_name(raw: &str, brand: &str) -> String {
    if raw.contains('\n') {
        return raw.split('\n').nth(1).unwrap_or_default().trim().to_string();
    }
    raw.strip_prefix(brand).unwrap_or(raw).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blocks: &[&str]) -> Html {
        let scripts: String = blocks
            .iter()
            .map(|b| format!(r#"<script type="application/ld+json">{}</script>"#, b))
            .collect();
        Html::parse_document(&format!("<html><head>{}</head><body></body></html>", scripts))
    }

    const ARTICLE: &str = r#"{
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": "10 Rekomendasi Rice Cooker Terbaik",
        "description": "Memilih rice cooker tidak mudah.",
        "mainEntity": [
            {"@type": "WebPage", "name": "ignored"},
            {"@type": "ItemList", "itemListElement": [
                {"@type": "ListItem", "position": 1, "item": {
                    "name": "Philips\nHD3138",
                    "image": ["https://img.my-best.com/p/1a.jpg", "https://img.my-best.com/p/1b.jpg"],
                    "brand": {"@type": "Brand", "name": "Philips"},
                    "offers": {"@type": "AggregateOffer", "lowPrice": 459000}
                }},
                {"@type": "ListItem", "position": 2, "item": {
                    "name": "Miyako MCM-508",
                    "image": "https://img.my-best.com/p/2.jpg",
                    "brand": {"name": "Miyako"},
                    "offers": {"lowPrice": "199000"}
                }}
            ]}
        ]
    }"#;

    #[test]
    fn test_product_name_multiline() {
        assert_eq!(product_name("Brand X\nModel Y", "Brand X"), "Model Y");
        assert_eq!(product_name("Brand X\n  Model Y  \nextra", ""), "Model Y");
    }

    #[test]
    fn test_product_name_brand_prefix() {
        assert_eq!(product_name("Brand X Model Y", "Brand X"), "Model Y");
        assert_eq!(product_name("Model Y", "Brand X"), "Model Y");
        assert_eq!(product_name("  Model Y ", ""), "Model Y");
    }

    #[test]
    fn test_article_block() {
        let article = extract_structured(&page(&[ARTICLE]));
        assert_eq!(article.title, "10 Rekomendasi Rice Cooker Terbaik");
        assert_eq!(article.intro, "Memilih rice cooker tidak mudah.");
        assert_eq!(article.products.len(), 2);

        let first = &article.products[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.brand_name, "Philips");
        assert_eq!(first.product_name, "HD3138");
        assert_eq!(first.price_display, "Rp 459.000");
        assert_eq!(first.images.len(), 2);
        assert_eq!(first.primary_image, "https://img.my-best.com/p/1a.jpg");
        assert_eq!(first.rating_point, "");
        assert_eq!(first.affiliate_link, "");

        let second = &article.products[1];
        assert_eq!(second.rank, 2);
        assert_eq!(second.product_name, "MCM-508");
        assert_eq!(second.price_display, "Rp 199.000");
        assert_eq!(second.images, vec!["https://img.my-best.com/p/2.jpg".to_string()]);
    }

    #[test]
    fn test_breadcrumb_category() {
        let breadcrumb = r#"{"@type": "BreadcrumbList", "itemListElement": [
            {"position": 1, "name": "Home"},
            {"position": 2, "name": "PERALATAN DAPUR"},
            {"position": 3, "name": "Rice Cooker"}
        ]}"#;

        let article = extract_structured(&page(&[breadcrumb]));
        assert_eq!(article.category, "Peralatan Dapur");
        assert!(article.products.is_empty());
    }

    #[test]
    fn test_short_breadcrumb_ignored() {
        let breadcrumb =
            r#"{"@type": "BreadcrumbList", "itemListElement": [{"position": 1, "name": "Home"}]}"#;
        assert_eq!(extract_structured(&page(&[breadcrumb])).category, "");
    }

    #[test]
    fn test_malformed_and_unrelated_blocks_skipped() {
        let article = extract_structured(&page(&[
            r#"{"@type": "Article", "mainEntity": ["#,
            r#"{"@type": "Organization", "name": "mybest"}"#,
            r#"{"@type": "Article", "headline": 5, "mainEntity": []}"#,
            ARTICLE,
        ]));

        assert_eq!(article.title, "10 Rekomendasi Rice Cooker Terbaik");
        assert_eq!(article.products.len(), 2);
    }

    #[test]
    fn test_article_without_item_list_marker_ignored() {
        let article =
            extract_structured(&page(&[r#"{"@type": "Article", "headline": "Tanpa daftar"}"#]));
        assert_eq!(article.title, "");
    }

    #[test]
    fn test_top_level_array() {
        let combined = format!(
            r#"[{{"@type": "BreadcrumbList", "itemListElement": [{{"name": "a"}}, {{"name": "elektronik"}}]}}, {}]"#,
            ARTICLE
        );
        let article = extract_structured(&page(&[&combined]));
        assert_eq!(article.category, "Elektronik");
        assert_eq!(article.products.len(), 2);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let block = r#"{"@type": "Article", "mainEntity": {"@type": "ItemList", "itemListElement": [
            {"item": {"name": "Tanpa posisi", "image": null, "offers": null}}
        ]}}"#;

        let article = extract_structured(&page(&[block]));
        assert_eq!(article.products.len(), 1);
        let product = &article.products[0];
        assert_eq!(product.rank, 0);
        assert_eq!(product.brand_name, "");
        assert_eq!(product.product_name, "Tanpa posisi");
        assert_eq!(product.price_display, "");
        assert!(product.images.is_empty());
        assert_eq!(product.primary_image, "");
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let block = r#"{"@type": "Article", "headline": "H", "description": null, "mainEntity": [
            {"@type": "ItemList", "itemListElement": [
                {"position": 1, "item": {"name": "Tanpa merek", "brand": {"name": null}}},
                {"position": null, "item": {"name": null, "brand": null, "offers": {"lowPrice": null}}}
            ]},
            {"@type": "ItemList", "itemListElement": null}
        ]}"#;
        let breadcrumb = r#"{"@type": "BreadcrumbList", "itemListElement": null}"#;

        let article = extract_structured(&page(&[block, breadcrumb]));
        assert_eq!(article.title, "H");
        assert_eq!(article.intro, "");
        assert_eq!(article.category, "");
        assert_eq!(article.products.len(), 2);

        assert_eq!(article.products[0].rank, 1);
        assert_eq!(article.products[0].brand_name, "");
        assert_eq!(article.products[0].product_name, "Tanpa merek");

        assert_eq!(article.products[1].rank, 0);
        assert_eq!(article.products[1].product_name, "");
        assert_eq!(article.products[1].price_display, "");
    }

    #[test]
    fn test_float_price() {
        let block = r#"{"@type": "Article", "mainEntity": [{"@type": "ItemList", "itemListElement": [
            {"position": 1, "item": {"name": "A", "offers": {"lowPrice": 325000.0}}}
        ]}]}"#;
        let article = extract_structured(&page(&[block]));
        assert_eq!(article.products[0].price_display, "Rp 325.000");
    }
}
