//! Normalization from raw catalog [`Product`] records to [`NormalizedProduct`].
//!
//! The normalizer is total: every input shape yields a product. Related
//! records that arrive as lists collapse to their first element, blank
//! strings become `None`, and out-of-range numbers are clamped into their
//! documented domain. Missing values stay `None` here; coercion to zero is
//! left to the few consumers that need it.

use portfolio_core::{NormalizedProduct, Prediction, Product, Readiness, Related};

/// Normalizes one raw [`Product`] into a [`NormalizedProduct`].
#[must_use]
pub fn normalize_product(product: Product) -> NormalizedProduct {
    let readiness = resolve_related(&product.id, "readiness", product.readiness)
        .map(normalize_readiness);
    let prediction = resolve_related(&product.id, "prediction", product.prediction)
        .map(normalize_prediction);

    NormalizedProduct {
        id: product.id,
        name: product.name,
        description: non_blank(product.description),
        product_type: non_blank(product.product_type),
        region: non_blank(product.region),
        lifecycle_stage: non_blank(product.lifecycle_stage),
        governance_tier: non_blank(product.governance_tier),
        revenue_target: product
            .revenue_target
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0)),
        owner_email: non_blank(product.owner_email),
        budget_code: non_blank(product.budget_code),
        pii_flag: product.pii_flag,
        gating_status: non_blank(product.gating_status),
        success_metric: non_blank(product.success_metric),
        readiness,
        prediction,
    }
}

/// Normalizes a batch, preserving input order.
#[must_use]
pub fn normalize_products(products: Vec<Product>) -> Vec<NormalizedProduct> {
    products.into_iter().map(normalize_product).collect()
}

fn resolve_related<T>(product_id: &str, field: &str, related: Option<Related<T>>) -> Option<T> {
    let related = related?;
    if related.len() > 1 {
        tracing::debug!(
            product_id,
            field,
            count = related.len(),
            "related list holds more than one record; keeping the first"
        );
    }
    related.into_single()
}

fn normalize_readiness(readiness: Readiness) -> Readiness {
    Readiness {
        readiness_score: readiness
            .readiness_score
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 100.0)),
        risk_band: non_blank(readiness.risk_band),
    }
}

fn normalize_prediction(prediction: Prediction) -> Prediction {
    Prediction {
        success_probability: unit_interval(prediction.success_probability),
        revenue_probability: unit_interval(prediction.revenue_probability),
        failure_risk: unit_interval(prediction.failure_risk),
    }
}

fn unit_interval(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Treat empty or whitespace-only strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
