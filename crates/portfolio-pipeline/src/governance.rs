//! Declarative governance rules evaluated against normalized products.
//!
//! A rule is data: an id, a human description, a severity and a predicate.
//! The default set is assembled from [`GovernanceConfig`] thresholds, so a
//! new check is one more entry in [`default_rules`] rather than a new code
//! path in the evaluator.

use std::fmt;

use portfolio_core::{GovernanceConfig, LifecycleStage, NormalizedProduct};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

type Predicate = Box<dyn Fn(&NormalizedProduct) -> bool + Send + Sync>;

pub struct GovernanceRule {
    pub id: &'static str,
    pub description: String,
    pub severity: Severity,
    predicate: Predicate,
}

impl GovernanceRule {
    pub fn new(
        id: &'static str,
        description: impl Into<String>,
        severity: Severity,
        predicate: impl Fn(&NormalizedProduct) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            severity,
            predicate: Box::new(predicate),
        }
    }

    /// Returns `true` when `product` violates this rule.
    #[must_use]
    pub fn is_violated_by(&self, product: &NormalizedProduct) -> bool {
        (self.predicate)(product)
    }
}

impl fmt::Debug for GovernanceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GovernanceRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceFinding {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub product_id: String,
    pub product_name: String,
    pub message: String,
}

/// The standard rule set, in evaluation order.
#[must_use]
pub fn default_rules(config: &GovernanceConfig) -> Vec<GovernanceRule> {
    let failure_threshold = config.high_risk_failure_threshold;
    let revenue_threshold = config.low_revenue_threshold;
    let min_readiness = config.commercial_min_readiness;

    vec![
        GovernanceRule::new(
            "high-risk-low-revenue",
            format!(
                "failure risk above {failure_threshold} with revenue target below {revenue_threshold}"
            ),
            Severity::High,
            move |p| {
                p.failure_risk().unwrap_or(0.0) > failure_threshold
                    && p.revenue_target_or_zero() < revenue_threshold
            },
        ),
        GovernanceRule::new(
            "pii-without-owner",
            "handles PII but has no accountable owner",
            Severity::High,
            |p| p.pii_flag == Some(true) && p.owner_email.is_none(),
        ),
        GovernanceRule::new(
            "commercial-low-readiness",
            format!("commercial product with readiness below {min_readiness}"),
            Severity::Medium,
            move |p| {
                p.stage() == Some(LifecycleStage::Commercial)
                    && p.readiness_score_or_zero() < min_readiness
            },
        ),
        GovernanceRule::new(
            "missing-success-metric",
            "in pilot or commercial stage without a success metric",
            Severity::Low,
            |p| {
                matches!(
                    p.stage(),
                    Some(LifecycleStage::Pilot | LifecycleStage::Commercial)
                ) && p.success_metric.is_none()
            },
        ),
        GovernanceRule::new(
            "sunset-with-revenue-target",
            "sunset product still carries a revenue target",
            Severity::Low,
            |p| p.stage() == Some(LifecycleStage::Sunset) && p.revenue_target_or_zero() > 0.0,
        ),
    ]
}

/// Evaluates every rule against every product.
///
/// Findings are ordered by rule (in `rules` order), then by product (in
/// input order).
#[must_use]
pub fn evaluate(rules: &[GovernanceRule], products: &[NormalizedProduct]) -> Vec<GovernanceFinding> {
    let findings: Vec<GovernanceFinding> = rules
        .iter()
        .flat_map(|rule| {
            products
                .iter()
                .filter(move |product| rule.is_violated_by(product))
                .map(move |product| GovernanceFinding {
                    rule_id: rule.id,
                    severity: rule.severity,
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    message: format!("{}: {}", product.name, rule.description),
                })
        })
        .collect();

    tracing::debug!(
        rules = rules.len(),
        products = products.len(),
        findings = findings.len(),
        "governance evaluation complete"
    );
    findings
}
