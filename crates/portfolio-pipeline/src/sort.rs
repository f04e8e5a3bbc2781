//! Stable sorting and grouping of filtered product lists.

use std::cmp::Ordering;
use std::str::FromStr;

use portfolio_core::{LifecycleStage, NormalizedProduct, RiskBand};
use serde::Serialize;

use crate::UNASSIGNED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Case-insensitive display name.
    Name,
    ReadinessScore,
    RevenueTarget,
    /// Canonical stage order; unrecognized labels sort with missing ones.
    LifecycleStage,
    /// `low < medium < high`.
    RiskSeverity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "readiness" | "readiness_score" => Ok(SortKey::ReadinessScore),
            "revenue" | "revenue_target" => Ok(SortKey::RevenueTarget),
            "stage" | "lifecycle_stage" => Ok(SortKey::LifecycleStage),
            "risk" | "risk_severity" => Ok(SortKey::RiskSeverity),
            other => Err(format!(
                "unknown sort key '{other}' (expected name, readiness, revenue, stage or risk)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

/// Returns a new list ordered by `key`.
///
/// The sort is stable: products that compare equal keep their input order.
/// Products with no value for `key` always come last, in either direction.
#[must_use]
pub fn sort_products(
    products: &[NormalizedProduct],
    key: SortKey,
    direction: SortDirection,
) -> Vec<NormalizedProduct> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key, direction));
    sorted
}

fn compare(
    a: &NormalizedProduct,
    b: &NormalizedProduct,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    match key {
        SortKey::Name => apply(
            direction,
            a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ),
        SortKey::ReadinessScore => missing_last(a.readiness_score(), b.readiness_score(), |x, y| {
            apply(direction, x.total_cmp(&y))
        }),
        SortKey::RevenueTarget => missing_last(a.revenue_target, b.revenue_target, |x, y| {
            apply(direction, x.total_cmp(&y))
        }),
        SortKey::LifecycleStage => missing_last(a.stage(), b.stage(), |x, y| {
            apply(direction, x.cmp(&y))
        }),
        SortKey::RiskSeverity => missing_last(
            a.risk_band().map(severity),
            b.risk_band().map(severity),
            |x, y| apply(direction, x.cmp(&y)),
        ),
    }
}

fn apply(direction: SortDirection, ordering: Ordering) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn severity(band: RiskBand) -> u8 {
    match band {
        RiskBand::Low => 0,
        RiskBand::Medium => 1,
        RiskBand::High => 2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    ProductType,
    Region,
    LifecycleStage,
    RiskBand,
    GovernanceTier,
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" | "product_type" => Ok(GroupKey::ProductType),
            "region" => Ok(GroupKey::Region),
            "stage" | "lifecycle_stage" => Ok(GroupKey::LifecycleStage),
            "risk" | "risk_band" => Ok(GroupKey::RiskBand),
            "tier" | "governance_tier" => Ok(GroupKey::GovernanceTier),
            other => Err(format!(
                "unknown group key '{other}' (expected type, region, stage, risk or tier)"
            )),
        }
    }
}

impl GroupKey {
    fn value_of(self, product: &NormalizedProduct) -> Option<&str> {
        match self {
            GroupKey::ProductType => product.product_type.as_deref(),
            GroupKey::Region => product.region.as_deref(),
            GroupKey::LifecycleStage => product.lifecycle_stage.as_deref(),
            GroupKey::RiskBand => product.risk_band_label(),
            GroupKey::GovernanceTier => product.governance_tier.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGroup {
    /// Grouping value, `None` for products that carry none.
    pub key: Option<String>,
    pub products: Vec<NormalizedProduct>,
}

impl ProductGroup {
    /// Display label; the valueless group renders as `"unassigned"`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(UNASSIGNED)
    }
}

/// Splits an already sorted list into groups.
///
/// Groups appear in first-seen order and members keep their input order.
/// Grouping by lifecycle stage instead emits the canonical stages first in
/// stage order, followed by unrecognized labels in first-seen order. Products
/// with no value share one group keyed `None`, distinct from any product
/// whose value happens to read `"unassigned"`.
#[must_use]
pub fn group_products(products: &[NormalizedProduct], key: GroupKey) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = Vec::new();
    for product in products {
        let value = key.value_of(product);
        match groups.iter_mut().find(|g| g.key.as_deref() == value) {
            Some(group) => group.products.push(product.clone()),
            None => groups.push(ProductGroup {
                key: value.map(str::to_string),
                products: vec![product.clone()],
            }),
        }
    }

    if key == GroupKey::LifecycleStage {
        // Canonical stages get their rank; everything else shares the
        // trailing rank so the stable sort keeps first-seen order.
        groups.sort_by_key(|g| {
            g.key
                .as_deref()
                .and_then(LifecycleStage::from_label)
                .map_or(LifecycleStage::ALL.len(), LifecycleStage::position)
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use portfolio_core::Readiness;

    use super::*;

    fn make_product(
        id: &str,
        name: &str,
        score: Option<f64>,
        stage: Option<&str>,
        band: Option<&str>,
    ) -> NormalizedProduct {
        NormalizedProduct {
            id: id.to_string(),
            name: name.to_string(),
            lifecycle_stage: stage.map(str::to_string),
            readiness: Some(Readiness {
                readiness_score: score,
                risk_band: band.map(str::to_string),
            }),
            ..NormalizedProduct::default()
        }
    }

    fn ids(products: &[NormalizedProduct]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn sort_by_readiness_is_stable_for_ties() {
        let products = vec![
            make_product("zeta", "Zeta", Some(50.0), None, None),
            make_product("alpha", "Alpha", Some(50.0), None, None),
            make_product("top", "Top", Some(90.0), None, None),
        ];
        let asc = sort_products(&products, SortKey::ReadinessScore, SortDirection::Ascending);
        assert_eq!(ids(&asc), vec!["zeta", "alpha", "top"]);

        let desc = sort_products(&products, SortKey::ReadinessScore, SortDirection::Descending);
        assert_eq!(ids(&desc), vec!["top", "zeta", "alpha"]);
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let products = vec![
            make_product("b", "B", Some(2.0), None, None),
            make_product("a", "A", Some(1.0), None, None),
        ];
        let _ = sort_products(&products, SortKey::Name, SortDirection::Ascending);
        assert_eq!(ids(&products), vec!["b", "a"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let products = vec![
            make_product("1", "beta", None, None, None),
            make_product("2", "Alpha", None, None, None),
            make_product("3", "alpha", None, None, None),
        ];
        let sorted = sort_products(&products, SortKey::Name, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let products = vec![
            make_product("none", "None", None, None, None),
            make_product("low", "Low", Some(10.0), None, None),
            make_product("high", "High", Some(80.0), None, None),
        ];
        let asc = sort_products(&products, SortKey::ReadinessScore, SortDirection::Ascending);
        assert_eq!(ids(&asc), vec!["low", "high", "none"]);
        let desc = sort_products(&products, SortKey::ReadinessScore, SortDirection::Descending);
        assert_eq!(ids(&desc), vec!["high", "low", "none"]);
    }

    #[test]
    fn lifecycle_sort_uses_canonical_order() {
        let products = vec![
            make_product("s", "S", None, Some("sunset"), None),
            make_product("c", "C", None, Some("concept"), None),
            make_product("x", "X", None, Some("retired"), None),
            make_product("p", "P", None, Some("pilot"), None),
            make_product("e", "E", None, Some("early_pilot"), None),
        ];
        let sorted = sort_products(&products, SortKey::LifecycleStage, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["c", "e", "p", "s", "x"]);
    }

    #[test]
    fn risk_severity_orders_low_to_high() {
        let products = vec![
            make_product("h", "H", None, None, Some("high")),
            make_product("l", "L", None, None, Some("low")),
            make_product("m", "M", None, None, Some("medium")),
        ];
        let sorted = sort_products(&products, SortKey::RiskSeverity, SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["h", "m", "l"]);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut products = vec![
            make_product("1", "A", None, None, Some("high")),
            make_product("2", "B", None, None, Some("low")),
            make_product("3", "C", None, None, Some("high")),
            make_product("4", "D", None, None, None),
        ];
        products[3].readiness = None;
        let groups = group_products(&products, GroupKey::RiskBand);
        let keys: Vec<&str> = groups.iter().map(ProductGroup::label).collect();
        assert_eq!(keys, vec!["high", "low", UNASSIGNED]);
        assert_eq!(ids(&groups[0].products), vec!["1", "3"]);
    }

    #[test]
    fn region_named_unassigned_is_its_own_group() {
        let mut products = vec![
            make_product("1", "A", None, None, None),
            make_product("2", "B", None, None, None),
        ];
        products[1].region = Some(UNASSIGNED.to_string());
        let groups = group_products(&products, GroupKey::Region);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, None);
        assert_eq!(ids(&groups[0].products), vec!["1"]);
        assert_eq!(groups[1].key.as_deref(), Some(UNASSIGNED));
        assert_eq!(ids(&groups[1].products), vec!["2"]);
    }

    #[test]
    fn lifecycle_groups_follow_stage_order() {
        let products = vec![
            make_product("1", "A", None, Some("commercial"), None),
            make_product("2", "B", None, Some("legacy"), None),
            make_product("3", "C", None, Some("concept"), None),
            make_product("4", "D", None, None, None),
            make_product("5", "E", None, Some("commercial"), None),
        ];
        let groups = group_products(&products, GroupKey::LifecycleStage);
        let keys: Vec<&str> = groups.iter().map(ProductGroup::label).collect();
        assert_eq!(keys, vec!["concept", "commercial", "legacy", UNASSIGNED]);
        assert_eq!(ids(&groups[1].products), vec!["1", "5"]);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("readiness".parse::<SortKey>(), Ok(SortKey::ReadinessScore));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert_eq!("tier".parse::<GroupKey>(), Ok(GroupKey::GovernanceTier));
        assert!("colour".parse::<SortKey>().is_err());
    }
}
