//! Rank-keyed join of structured product records with the comparison side table.

use crate::mybest::models::{ProductRecord, SideTable};

/// Fills `rating_point` and `affiliate_link` of each primary record from the
/// side-table row with the same rank.
///
/// Output order and length follow `primary`. Records without a side-table
/// row get empty extras, and side-table ranks missing from `primary` are dropped.
pub fn merge(primary: Vec<ProductRecord>, side: &SideTable) -> Vec<ProductRecord> {
    primary
        .into_iter()
        .map(|mut product| {
            let extras = side.get(product.rank).cloned().unwrap_or_default();
            product.rating_point = extras.point;
            product.affiliate_link = extras.affiliate_link;
            product
        })
        .collect()
}
