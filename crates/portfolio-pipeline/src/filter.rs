//! Predicate evaluation of a [`FilterState`] against normalized products.

use portfolio_core::{FilterState, NormalizedProduct};

/// Returns `true` when `product` satisfies every active criterion.
///
/// All six predicates are ANDed: name search (case-insensitive substring),
/// five exact-match categorical criteria with the `"all"` sentinel, and the
/// inclusive readiness range. A product without a readiness score is compared
/// as score `0`, so raising `readiness_min` above zero excludes unassessed
/// products.
#[must_use]
pub fn matches(product: &NormalizedProduct, filters: &FilterState) -> bool {
    matches_search(product, &filters.search)
        && filters
            .product_type
            .admits(product.product_type.as_deref())
        && filters
            .lifecycle_stage
            .admits(product.lifecycle_stage.as_deref())
        && filters.risk_band.admits(product.risk_band_label())
        && filters.region.admits(product.region.as_deref())
        && filters
            .governance_tier
            .admits(product.governance_tier.as_deref())
        && matches_readiness(product, filters)
}

/// Returns the products that pass `filters`, in input order.
#[must_use]
pub fn filter_products(
    products: &[NormalizedProduct],
    filters: &FilterState,
) -> Vec<NormalizedProduct> {
    products
        .iter()
        .filter(|product| matches(product, filters))
        .cloned()
        .collect()
}

fn matches_search(product: &NormalizedProduct, search: &str) -> bool {
    search.is_empty() || product.name.to_lowercase().contains(&search.to_lowercase())
}

fn matches_readiness(product: &NormalizedProduct, filters: &FilterState) -> bool {
    let score = product.readiness_score_or_zero();
    filters.readiness_min <= score && score <= filters.readiness_max
}
