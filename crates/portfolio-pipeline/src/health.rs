//! Data-contract completeness over the mandatory product metadata fields.
//!
//! Scores range from 0 to 100; each mandatory field contributes its weight
//! when present.

use portfolio_core::NormalizedProduct;
use serde::Serialize;

use crate::aggregate::mean;

/// `owner_email` is set.
pub const W_OWNER: u8 = 20;
/// `budget_code` is set.
pub const W_BUDGET: u8 = 20;
/// `pii_flag` has been declared, either way.
pub const W_PII: u8 = 20;
/// `gating_status` is set.
pub const W_GATING: u8 = 20;
/// `success_metric` is set.
pub const W_SUCCESS_METRIC: u8 = 20;

const _: () = assert!(
    W_OWNER + W_BUDGET + W_PII + W_GATING + W_SUCCESS_METRIC == 100,
    "data health weights must sum to exactly 100"
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataHealth {
    pub product_id: String,
    /// 0-100 weighted score.
    pub score: u8,
    /// Names of mandatory fields that are absent.
    pub missing: Vec<&'static str>,
}

impl DataHealth {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataHealthReport {
    pub products: Vec<DataHealth>,
    pub mean_score: f64,
    pub complete_count: usize,
}

#[must_use]
pub fn score_data_health(product: &NormalizedProduct) -> DataHealth {
    let checks: [(&'static str, u8, bool); 5] = [
        ("owner_email", W_OWNER, product.owner_email.is_some()),
        ("budget_code", W_BUDGET, product.budget_code.is_some()),
        ("pii_flag", W_PII, product.pii_flag.is_some()),
        ("gating_status", W_GATING, product.gating_status.is_some()),
        (
            "success_metric",
            W_SUCCESS_METRIC,
            product.success_metric.is_some(),
        ),
    ];

    let score = checks
        .iter()
        .filter(|(_, _, present)| *present)
        .map(|(_, weight, _)| weight)
        .sum();
    let missing = checks
        .iter()
        .filter(|(_, _, present)| !present)
        .map(|(field, _, _)| *field)
        .collect();

    DataHealth {
        product_id: product.id.clone(),
        score,
        missing,
    }
}

/// Scores every product. The mean of an empty portfolio is `0`.
#[must_use]
pub fn data_health_report(products: &[NormalizedProduct]) -> DataHealthReport {
    let scored: Vec<DataHealth> = products.iter().map(score_data_health).collect();
    DataHealthReport {
        mean_score: mean(scored.iter().map(|h| f64::from(h.score))),
        complete_count: scored.iter().filter(|h| h.is_complete()).count(),
        products: scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_product() -> NormalizedProduct {
        NormalizedProduct {
            id: "prd-001".to_string(),
            owner_email: Some("owner@example.com".to_string()),
            budget_code: Some("BC-1".to_string()),
            pii_flag: Some(false),
            gating_status: Some("approved".to_string()),
            success_metric: Some("tpv".to_string()),
            ..NormalizedProduct::default()
        }
    }

    #[test]
    fn complete_product_scores_100() {
        let health = score_data_health(&complete_product());
        assert_eq!(health.score, 100);
        assert!(health.is_complete());
    }

    #[test]
    fn declared_false_pii_counts_as_present() {
        let health = score_data_health(&complete_product());
        assert!(!health.missing.contains(&"pii_flag"));
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let product = NormalizedProduct {
            owner_email: None,
            gating_status: None,
            ..complete_product()
        };
        let health = score_data_health(&product);
        assert_eq!(health.score, 60);
        assert_eq!(health.missing, vec!["owner_email", "gating_status"]);
    }

    #[test]
    fn empty_product_scores_zero() {
        let health = score_data_health(&NormalizedProduct::default());
        assert_eq!(health.score, 0);
        assert_eq!(health.missing.len(), 5);
    }

    #[test]
    fn report_mean_and_complete_count() {
        let products = vec![complete_product(), NormalizedProduct::default()];
        let report = data_health_report(&products);
        assert!((report.mean_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.complete_count, 1);
        assert_eq!(report.products.len(), 2);
    }

    #[test]
    fn empty_report_is_zero() {
        let report = data_health_report(&[]);
        assert!(report.mean_score.abs() < f64::EPSILON);
        assert_eq!(report.complete_count, 0);
    }
}
