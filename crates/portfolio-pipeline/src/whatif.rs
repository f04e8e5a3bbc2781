//! Linear what-if projection over a product's prediction.
//!
//! Adjustments are a readiness change in score points and a revenue target
//! change in percent. Each projected probability moves linearly with fixed
//! per-unit coefficients and is clamped to `[0, 1]`.

use portfolio_core::{NormalizedProduct, Prediction};
use serde::Serialize;

/// Success probability gained per readiness point.
pub const SUCCESS_PER_READINESS_POINT: f64 = 0.004;
/// Success probability lost per percent of additional revenue ambition.
pub const SUCCESS_PER_REVENUE_PCT: f64 = -0.001;
/// Revenue probability gained per readiness point.
pub const REVENUE_PROB_PER_READINESS_POINT: f64 = 0.002;
/// Revenue probability lost per percent of additional revenue ambition.
pub const REVENUE_PROB_PER_REVENUE_PCT: f64 = -0.003;
/// Failure risk change per readiness point.
pub const FAILURE_PER_READINESS_POINT: f64 = -0.003;
/// Failure risk change per percent of additional revenue ambition.
pub const FAILURE_PER_REVENUE_PCT: f64 = 0.002;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WhatIfAdjustment {
    /// Change in readiness score, in points.
    pub readiness_delta: f64,
    /// Change in revenue target, in percent (`10.0` = +10%).
    pub revenue_change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfProjection {
    pub product_id: String,
    pub baseline_readiness: f64,
    pub projected_readiness: f64,
    pub baseline_revenue_target: f64,
    pub projected_revenue_target: f64,
    pub baseline: Prediction,
    pub projected: Prediction,
}

/// Projects `product` under `adjustment`. A product with no prediction
/// starts from all-zero probabilities and no readiness score from `0`.
#[must_use]
pub fn project(product: &NormalizedProduct, adjustment: WhatIfAdjustment) -> WhatIfProjection {
    let baseline = product.prediction.unwrap_or_default();
    let baseline_readiness = product.readiness_score_or_zero();
    let baseline_revenue = product.revenue_target_or_zero();

    let projected_readiness = (baseline_readiness + adjustment.readiness_delta).clamp(0.0, 100.0);
    // Coefficients apply to the readiness change that survives clamping.
    let readiness = projected_readiness - baseline_readiness;
    let revenue = adjustment.revenue_change_pct;

    let projected = Prediction {
        success_probability: unit(
            baseline.success_probability
                + readiness * SUCCESS_PER_READINESS_POINT
                + revenue * SUCCESS_PER_REVENUE_PCT,
        ),
        revenue_probability: unit(
            baseline.revenue_probability
                + readiness * REVENUE_PROB_PER_READINESS_POINT
                + revenue * REVENUE_PROB_PER_REVENUE_PCT,
        ),
        failure_risk: unit(
            baseline.failure_risk
                + readiness * FAILURE_PER_READINESS_POINT
                + revenue * FAILURE_PER_REVENUE_PCT,
        ),
    };

    WhatIfProjection {
        product_id: product.id.clone(),
        baseline_readiness,
        projected_readiness,
        baseline_revenue_target: baseline_revenue,
        projected_revenue_target: (baseline_revenue * (1.0 + revenue / 100.0)).max(0.0),
        baseline,
        projected,
    }
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
