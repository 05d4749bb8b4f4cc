//! Side-table extraction from the rendered comparison table.

use crate::mybest::affiliate::AffiliateRewriter;
use crate::mybest::models::{SideTable, SupplementaryRow};
use crate::mybest::selectors::detail;
use crate::mybest::text::clean_text_opt;
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};

/// Collects `{point, affiliate_link}` per rank from the comparison table.
///
/// Rows without a numeric rank are skipped. A later row with an already
/// seen rank replaces the earlier one.
pub fn extract_side_table(document: &Html, rewriter: &AffiliateRewriter) -> SideTable {
    let mut table = SideTable::new();

    for row in document.select(&detail::COMPARISON_ROW) {
        let cells: Vec<ElementRef> = row.select(&detail::CELL).collect();

        let rank = parse_rank(&clean_text_opt(cells.get(detail::RANK_CELL).copied()));
        if rank == 0 {
            trace!("Skipping comparison row without rank");
            continue;
        }

        let affiliate_link = cells
            .get(detail::LINK_CELL)
            .map(|cell| first_affiliate_link(*cell, rewriter))
            .unwrap_or_default();

        let point = clean_text_opt(cells.get(detail::POINT_CELL).copied());

        trace!("Rank {}: point={:?} link={:?}", rank, point, affiliate_link);

        if table.insert(SupplementaryRow { rank, point, affiliate_link }).is_some() {
            warn!("Comparison table repeats rank {}; keeping the later row", rank);
        }
    }

    debug!("Collected {} comparison rows", table.len());
    table
}

/// Extracts the first run of ASCII digits as a rank; 0 when there is none.
pub fn parse_rank(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    digits.parse().unwrap_or(0)
}

/// Returns the first anchor href in the cell that the rewriter accepts.
fn first_affiliate_link(cell: ElementRef<'_>, rewriter: &AffiliateRewriter) -> String {
    cell.select(&detail::ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| rewriter.rewrite(href))
        .find(|link| !link.is_empty())
        .unwrap_or_default()
}
