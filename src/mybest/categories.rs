//! Category tile discovery on the category index pages.
//!
//! Tiles have no machine-readable label, so the display name is recovered by
//! an ordered list of strategies over the anchor's markup. The first strategy
//! producing a plausible name wins; if none does, a placeholder is used.

use crate::mybest::models::CategoryTile;
use crate::mybest::selectors::categories;
use crate::mybest::text::{collapse_whitespace, text_without, title_case};
use regex_lite::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Category or tag link whose last path segment is numeric.
static CATEGORY_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:categories|tags)/(?:[^/?#]+/)*(\d+)/?(?:[?#]|$)").unwrap()
});

/// `src` attribute inside raw no-script markup.
static RAW_IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\ssrc\s*=\s*["']([^"']+)["']"#).unwrap());

/// Markup that never contributes to a tile name.
const DECORATIVE_TAGS: &[&str] = &["img", "picture", "svg", "i", "noscript", "script", "style"];

/// Elements that start a new text fragment in the block fallback.
const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "section", "article",
    "header", "footer", "figure", "figcaption", "br",
];

/// Containers that may hold the label next to the tile image.
const LABEL_CONTAINERS: &[&str] = &["div", "span", "p"];

const FRAGMENT_SEPARATOR: char = '\u{1f}';

/// A name-producing strategy; `None` means it found nothing.
type NameStrategy = fn(ElementRef<'_>) -> Option<String>;

/// Strategies in priority order.
const NAME_STRATEGIES: &[NameStrategy] = &[label_beside_image, first_block_fragment];

/// Accumulates tiles over several pages, keeping the first tile for each slug.
#[derive(Debug, Clone)]
pub struct CategoryDiscovery {
    api_base: String,
    asset_host_token: String,
    seen: HashSet<String>,
    tiles: Vec<CategoryTile>,
}

impl CategoryDiscovery {
    /// Creates an empty discovery run.
    pub fn new(api_base: impl Into<String>, asset_host_token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            asset_host_token: asset_host_token.into(),
            seen: HashSet::new(),
            tiles: Vec::new(),
        }
    }

    /// Scans one page and returns how many new tiles it contributed.
    pub fn scan(&mut self, html: &str) -> usize {
        let document = Html::parse_document(html);
        let before = self.tiles.len();

        for anchor in document.select(&categories::LINK) {
            let Some(slug) = anchor.value().attr("href").and_then(category_slug) else {
                continue;
            };

            if !self.seen.insert(slug.to_string()) {
                trace!("Category {} already discovered", slug);
                continue;
            }

            let tile = CategoryTile {
                name: resolve_name(anchor, slug),
                image_url: tile_image(anchor, &self.asset_host_token),
                slug: slug.to_string(),
                api_link: format!("{}/category/{}", self.api_base, slug),
            };
            trace!("Category {}: {:?}", tile.slug, tile.name);
            self.tiles.push(tile);
        }

        let added = self.tiles.len() - before;
        debug!("Discovered {} new categories ({} total)", added, self.tiles.len());
        added
    }

    /// Returns the tiles discovered so far.
    pub fn tiles(&self) -> &[CategoryTile] {
        &self.tiles
    }

    /// Consumes the run, returning tiles in discovery order.
    pub fn into_tiles(self) -> Vec<CategoryTile> {
        self.tiles
    }
}

/// Extracts the numeric slug from a category or tag link.
pub fn category_slug(href: &str) -> Option<&str> {
    CATEGORY_HREF.captures(href).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Tile image: the no-script fallback first, then a plain `img`, both
/// restricted to the asset host.
fn tile_image(anchor: ElementRef<'_>, asset_host_token: &str) -> String {
    noscript_image(anchor, asset_host_token)
        .or_else(|| {
            anchor
                .select(&categories::IMAGE)
                .filter_map(|img| img.value().attr("src"))
                .find(|src| src.contains(asset_host_token))
                .map(String::from)
        })
        .unwrap_or_default()
}

fn noscript_image(anchor: ElementRef<'_>, asset_host_token: &str) -> Option<String> {
    for noscript in anchor.select(&categories::NOSCRIPT) {
        // Parsed markup, when the document was parsed without scripting
        if let Some(src) = noscript
            .select(&categories::IMAGE)
            .filter_map(|img| img.value().attr("src"))
            .find(|src| src.contains(asset_host_token))
        {
            return Some(src.to_string());
        }

        // Raw text, when the parser kept no-script content verbatim
        let raw = noscript.text().collect::<String>();
        if let Some(src) = RAW_IMG_SRC
            .captures_iter(&raw)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .find(|src| src.contains(asset_host_token))
        {
            return Some(src.to_string());
        }
    }
    None
}

/// Runs the name strategies and falls back to `"Category <slug>"`.
pub fn resolve_name(anchor: ElementRef<'_>, slug: &str) -> String {
    let name = NAME_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(anchor).filter(|name| is_plausible_name(name)))
        .unwrap_or_else(|| format!("Category {}", slug));

    title_case(&name.to_lowercase())
}

/// Rejects empty names and leaked template or style syntax.
fn is_plausible_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('{')
}

/// Text of the first plain container following the tile image.
///
/// Starting at the anchor's first image, each level up to the anchor is
/// checked for a following sibling that is a plain container without images
/// or no-script blocks; the first child of that container carries the label.
fn label_beside_image(anchor: ElementRef<'_>) -> Option<String> {
    let mut current = anchor.select(&categories::IMAGE).next()?;

    loop {
        if let Some(container) =
            current.next_siblings().filter_map(ElementRef::wrap).find(|el| is_label_container(*el))
        {
            return Some(first_child_text(container));
        }

        let parent = current.parent().and_then(ElementRef::wrap)?;
        if parent.id() == anchor.id() {
            return None;
        }
        current = parent;
    }
}

fn is_label_container(element: ElementRef<'_>) -> bool {
    LABEL_CONTAINERS.contains(&element.value().name())
        && element.select(&categories::IMAGE).next().is_none()
        && element.select(&categories::NOSCRIPT).next().is_none()
}

fn first_child_text(container: ElementRef<'_>) -> String {
    let first = container.children().find(|child| match ElementRef::wrap(*child) {
        Some(element) => !DECORATIVE_TAGS.contains(&element.value().name()),
        None => child.value().as_text().is_some_and(|text| !text.trim().is_empty()),
    });

    let text = match first {
        Some(child) => match ElementRef::wrap(child) {
            Some(element) => text_without(element, DECORATIVE_TAGS),
            None => child.value().as_text().map(|t| t.to_string()).unwrap_or_default(),
        },
        None => String::new(),
    };

    collapse_whitespace(&text)
}

/// First text fragment of the anchor once it is split at block-level elements.
fn first_block_fragment(anchor: ElementRef<'_>) -> Option<String> {
    let mut marked = String::new();
    collect_marked(anchor, &mut marked);

    marked
        .split(FRAGMENT_SEPARATOR)
        .map(collapse_whitespace)
        .find(|fragment| {
            fragment.chars().count() >= 2 && !fragment.starts_with('.') && !fragment.contains('{')
        })
}

/// Writes the subtree's text with decorative markup dropped and a separator
/// before every block-level element.
fn collect_marked(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if DECORATIVE_TAGS.contains(&name) {
                continue;
            }
            if BLOCK_TAGS.contains(&name) {
                out.push(FRAGMENT_SEPARATOR);
            }
            collect_marked(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
