//! Next/prev/last page links for listing responses.

use crate::mybest::models::PageMeta;

/// How page numbers are placed into this service's listing URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUrlTemplate {
    /// `{base}/{page}`; page 1 is `{base}` itself. Used by the global list.
    Path(String),
    /// `{base}?page={page}`. Used by category-scoped lists.
    Query(String),
}

impl PageUrlTemplate {
    /// Builds the URL of a given page.
    pub fn url(&self, page: u32) -> String {
        match self {
            PageUrlTemplate::Path(base) if page <= 1 => base.clone(),
            PageUrlTemplate::Path(base) => format!("{}/{}", base, page),
            PageUrlTemplate::Query(base) => format!("{}?page={}", base, page),
        }
    }
}

/// Computes pagination metadata for `current` out of `max_page` pages.
///
/// A `max_page` of 0 means the page count is unknown and no links are produced.
pub fn paginate(current: u32, max_page: u32, template: &PageUrlTemplate) -> PageMeta {
    let mut meta = PageMeta { current_page: current, total_pages: max_page, ..PageMeta::default() };

    if max_page == 0 {
        return meta;
    }

    meta.last_page_url = template.url(max_page);

    if current < max_page {
        meta.has_next = true;
        meta.next_page_url = template.url(current + 1);
    }

    if current > 1 {
        meta.has_prev = true;
        meta.prev_page_url = template.url(current - 1);
    }

    meta
}
