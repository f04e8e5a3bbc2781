//! Portfolio-wide aggregates for dashboard tiles and charts.
//!
//! Every output is independent of input order: per-category rows are keyed
//! by a sorted map, histogram buckets are fixed and sums accumulate in
//! [`Decimal`] so addition order cannot change the result. Every division
//! guards against an empty denominator and yields `0` instead.

use std::collections::{BTreeMap, HashMap};

use portfolio_core::{LifecycleStage, NormalizedProduct, RiskBand};
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::UNASSIGNED;

/// Inclusive `(min, max)` bounds of the five histogram buckets.
///
/// Buckets are checked low to high and the first whose upper bound is not
/// exceeded wins, so a score of exactly 20 lands in `0-20` and fractional
/// scores between buckets (e.g. 20.5) land in the next one up.
pub const BUCKET_BOUNDS: [(u8, u8); 5] = [(0, 20), (21, 40), (41, 60), (61, 80), (81, 100)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    /// Chart label, e.g. `"21-40"`.
    pub label: String,
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    /// `None` for products that carry no type.
    pub product_type: Option<String>,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// All products of this type, including those with no recognized band.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueRollup {
    pub product_type: Option<String>,
    pub product_count: usize,
    /// Sum of revenue targets in millions, rounded to one decimal.
    pub total_millions: f64,
    /// Mean revenue target in millions, rounded to one decimal.
    pub average_millions: f64,
}

impl RiskBreakdown {
    /// Display label; untyped products render as `"unassigned"`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.product_type.as_deref().unwrap_or(UNASSIGNED)
    }
}

impl RevenueRollup {
    #[must_use]
    pub fn label(&self) -> &str {
        self.product_type.as_deref().unwrap_or(UNASSIGNED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub product_count: usize,
    pub mean_readiness: f64,
    pub mean_success_probability: f64,
    pub high_risk_count: usize,
    /// Sum of revenue targets in whole currency units.
    pub total_revenue: f64,
    pub commercial_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub readiness_histogram: Vec<HistogramBucket>,
    /// Success probability scaled to percent.
    pub success_histogram: Vec<HistogramBucket>,
    pub risk_by_type: Vec<RiskBreakdown>,
    pub revenue_by_type: Vec<RevenueRollup>,
    /// Stages with at least one product: canonical stages in lifecycle order,
    /// then unrecognized labels alphabetically.
    pub lifecycle_distribution: Vec<StageCount>,
    pub summary: PortfolioSummary,
}

/// Compute every dashboard aggregate over `products`.
#[must_use]
pub fn aggregate(products: &[NormalizedProduct]) -> PortfolioMetrics {
    PortfolioMetrics {
        readiness_histogram: histogram(products.iter().map(NormalizedProduct::readiness_score_or_zero)),
        success_histogram: histogram(
            products
                .iter()
                .map(|p| p.success_probability().unwrap_or(0.0) * 100.0),
        ),
        risk_by_type: risk_by_type(products),
        revenue_by_type: revenue_by_type(products),
        lifecycle_distribution: lifecycle_distribution(products),
        summary: summarize(products),
    }
}

/// Bucket `values` (each in `0..=100`) into the fixed five-bucket layout.
/// Every bucket is present even when empty.
#[must_use]
pub fn histogram(values: impl IntoIterator<Item = f64>) -> Vec<HistogramBucket> {
    let mut counts = [0usize; BUCKET_BOUNDS.len()];
    for value in values {
        counts[bucket_index(value)] += 1;
    }

    BUCKET_BOUNDS
        .iter()
        .zip(counts)
        .map(|(&(min, max), count)| HistogramBucket {
            label: format!("{min}-{max}"),
            min,
            max,
            count,
        })
        .collect()
}

fn bucket_index(value: f64) -> usize {
    BUCKET_BOUNDS
        .iter()
        .position(|&(_, max)| value <= f64::from(max))
        .unwrap_or(BUCKET_BOUNDS.len() - 1)
}

// Keyed by the raw option so a type literally named "unassigned" stays
// separate from products with no type.
fn type_key(product: &NormalizedProduct) -> Option<String> {
    product.product_type.clone()
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

fn risk_by_type(products: &[NormalizedProduct]) -> Vec<RiskBreakdown> {
    let mut rows: BTreeMap<Option<String>, RiskBreakdown> = BTreeMap::new();
    for product in products {
        let key = type_key(product);
        let row = rows.entry(key.clone()).or_insert_with(|| RiskBreakdown {
            product_type: key,
            low: 0,
            medium: 0,
            high: 0,
            total: 0,
        });
        row.total += 1;
        // Unrecognized or missing bands count toward `total` only.
        match product.risk_band() {
            Some(RiskBand::Low) => row.low += 1,
            Some(RiskBand::Medium) => row.medium += 1,
            Some(RiskBand::High) => row.high += 1,
            None => {}
        }
    }
    rows.into_values().collect()
}

fn revenue_by_type(products: &[NormalizedProduct]) -> Vec<RevenueRollup> {
    let mut groups: BTreeMap<Option<String>, (usize, Decimal)> = BTreeMap::new();
    for product in products {
        let entry = groups.entry(type_key(product)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += to_decimal(product.revenue_target_or_zero());
    }

    let million = Decimal::from(1_000_000);
    groups
        .into_iter()
        .map(|(product_type, (count, total))| {
            let total_millions = total / million;
            let average_millions = if count == 0 {
                Decimal::ZERO
            } else {
                total_millions / Decimal::from(count)
            };
            RevenueRollup {
                product_type,
                product_count: count,
                total_millions: round_one_decimal(total_millions),
                average_millions: round_one_decimal(average_millions),
            }
        })
        .collect()
}

fn round_one_decimal(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

fn lifecycle_distribution(products: &[NormalizedProduct]) -> Vec<StageCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in products.iter().filter_map(|p| p.lifecycle_stage.as_deref()) {
        *counts.entry(label).or_default() += 1;
    }

    let canonical = LifecycleStage::ALL.iter().filter_map(|stage| {
        counts.get(stage.as_str()).map(|&count| StageCount {
            stage: stage.as_str().to_string(),
            count,
        })
    });

    let mut unrecognized: Vec<StageCount> = counts
        .iter()
        .filter(|(label, _)| LifecycleStage::from_label(label).is_none())
        .map(|(label, &count)| StageCount {
            stage: (*label).to_string(),
            count,
        })
        .collect();
    unrecognized.sort_by(|a, b| a.stage.cmp(&b.stage));

    canonical.chain(unrecognized).collect()
}

/// Portfolio-wide scalars. An empty input yields all zeros.
#[must_use]
pub fn summarize(products: &[NormalizedProduct]) -> PortfolioSummary {
    PortfolioSummary {
        product_count: products.len(),
        mean_readiness: mean(products.iter().map(NormalizedProduct::readiness_score_or_zero)),
        mean_success_probability: mean(
            products
                .iter()
                .map(|p| p.success_probability().unwrap_or(0.0)),
        ),
        high_risk_count: products
            .iter()
            .filter(|p| p.risk_band() == Some(RiskBand::High))
            .count(),
        total_revenue: products
            .iter()
            .map(|p| to_decimal(p.revenue_target_or_zero()))
            .sum::<Decimal>()
            .to_f64()
            .unwrap_or(0.0),
        commercial_count: products
            .iter()
            .filter(|p| p.stage() == Some(LifecycleStage::Commercial))
            .count(),
    }
}

/// Arithmetic mean, `0` for no values. Summed in [`Decimal`] so the result
/// does not depend on the order of `values`.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0usize), |(sum, count), v| {
            (sum + to_decimal(v), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        (sum / Decimal::from(count)).to_f64().unwrap_or(0.0)
    }
}
