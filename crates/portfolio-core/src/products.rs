use serde::{Deserialize, Serialize};

/// A related record that the catalog service returns either as a single
/// object or as the result of a one-to-many join (a list that holds at most
/// one element in practice).
///
/// `Many` is listed first so that `[]` is never read as a defaulted `One`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Related<T> {
    /// Resolve to a single optional value. Lists yield their first element;
    /// an empty list is treated as absent.
    #[must_use]
    pub fn into_single(self) -> Option<T> {
        match self {
            Related::One(value) => Some(value),
            Related::Many(values) => values.into_iter().next(),
        }
    }

    /// Number of values carried. Used to spot joins that returned more rows
    /// than expected.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Related::One(_) => 1,
            Related::Many(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Server-computed readiness assessment for a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Readiness {
    /// Composite preparedness score in `[0, 100]`.
    pub readiness_score: Option<f64>,
    /// `"low"`, `"medium"` or `"high"`. Derived server-side, not authoritative.
    pub risk_band: Option<String>,
}

/// Server-computed success prediction for a product. All values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    pub success_probability: f64,
    pub revenue_probability: f64,
    pub failure_risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const ALL: [RiskBand; 3] = [RiskBand::Low, RiskBand::Medium, RiskBand::High];

    /// Parse a controlled-vocabulary risk label. Matching is exact.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "low" => Some(RiskBand::Low),
            "medium" => Some(RiskBand::Medium),
            "high" => Some(RiskBand::High),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered maturity stage. Declaration order is the canonical stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Concept,
    EarlyPilot,
    Pilot,
    Commercial,
    Sunset,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        LifecycleStage::Concept,
        LifecycleStage::EarlyPilot,
        LifecycleStage::Pilot,
        LifecycleStage::Commercial,
        LifecycleStage::Sunset,
    ];

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "concept" => Some(LifecycleStage::Concept),
            "early_pilot" => Some(LifecycleStage::EarlyPilot),
            "pilot" => Some(LifecycleStage::Pilot),
            "commercial" => Some(LifecycleStage::Commercial),
            "sunset" => Some(LifecycleStage::Sunset),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleStage::Concept => "concept",
            LifecycleStage::EarlyPilot => "early_pilot",
            LifecycleStage::Pilot => "pilot",
            LifecycleStage::Commercial => "commercial",
            LifecycleStage::Sunset => "sunset",
        }
    }

    /// Zero-based position in the canonical stage order.
    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portfolio product exactly as the catalog service returns it.
///
/// `readiness` and `prediction` may be missing, `null`, a single object, or a
/// one-element list. Use the pipeline normalizer before reading them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_type: Option<String>,
    pub region: Option<String>,
    pub lifecycle_stage: Option<String>,
    pub governance_tier: Option<String>,
    pub revenue_target: Option<f64>,
    pub owner_email: Option<String>,
    pub budget_code: Option<String>,
    pub pii_flag: Option<bool>,
    pub gating_status: Option<String>,
    pub success_metric: Option<String>,
    pub readiness: Option<Related<Readiness>>,
    pub prediction: Option<Related<Prediction>>,
}

/// A product with related records resolved to single optional values and
/// blank strings collapsed to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_type: Option<String>,
    pub region: Option<String>,
    pub lifecycle_stage: Option<String>,
    pub governance_tier: Option<String>,
    /// Non-negative revenue target in whole currency units.
    pub revenue_target: Option<f64>,
    pub owner_email: Option<String>,
    pub budget_code: Option<String>,
    pub pii_flag: Option<bool>,
    pub gating_status: Option<String>,
    pub success_metric: Option<String>,
    pub readiness: Option<Readiness>,
    pub prediction: Option<Prediction>,
}

impl NormalizedProduct {
    /// Readiness score when the product has been assessed.
    #[must_use]
    pub fn readiness_score(&self) -> Option<f64> {
        self.readiness.as_ref().and_then(|r| r.readiness_score)
    }

    /// Readiness score with "not assessed" read as `0`. Only the range
    /// filter, histograms and means use this coercion.
    #[must_use]
    pub fn readiness_score_or_zero(&self) -> f64 {
        self.readiness_score().unwrap_or(0.0)
    }

    /// Raw risk label as delivered, for exact-match filtering.
    #[must_use]
    pub fn risk_band_label(&self) -> Option<&str> {
        self.readiness.as_ref().and_then(|r| r.risk_band.as_deref())
    }

    /// Recognized risk band; unknown labels yield `None`.
    #[must_use]
    pub fn risk_band(&self) -> Option<RiskBand> {
        self.risk_band_label().and_then(RiskBand::from_label)
    }

    /// Recognized lifecycle stage; unknown labels yield `None`.
    #[must_use]
    pub fn stage(&self) -> Option<LifecycleStage> {
        self.lifecycle_stage
            .as_deref()
            .and_then(LifecycleStage::from_label)
    }

    #[must_use]
    pub fn success_probability(&self) -> Option<f64> {
        self.prediction.map(|p| p.success_probability)
    }

    #[must_use]
    pub fn failure_risk(&self) -> Option<f64> {
        self.prediction.map(|p| p.failure_risk)
    }

    #[must_use]
    pub fn revenue_target_or_zero(&self) -> f64 {
        self.revenue_target.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_one_resolves_to_value() {
        let related = Related::One(7);
        assert_eq!(related.into_single(), Some(7));
    }

    #[test]
    fn related_many_takes_first_element() {
        let related = Related::Many(vec![3, 4]);
        assert_eq!(related.len(), 2);
        assert_eq!(related.into_single(), Some(3));
    }

    #[test]
    fn related_empty_list_is_absent() {
        let related: Related<u8> = Related::Many(vec![]);
        assert!(related.is_empty());
        assert_eq!(related.into_single(), None);
    }

    #[test]
    fn deserializes_readiness_as_object() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p1","name":"PayLink","readiness":{"readiness_score":72,"risk_band":"low"}}"#,
        )
        .unwrap();
        let readiness = product.readiness.and_then(Related::into_single).unwrap();
        assert_eq!(readiness.readiness_score, Some(72.0));
        assert_eq!(readiness.risk_band.as_deref(), Some("low"));
    }

    #[test]
    fn deserializes_readiness_as_single_element_list() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p1","name":"PayLink","readiness":[{"readiness_score":72,"risk_band":"low"}]}"#,
        )
        .unwrap();
        let readiness = product.readiness.and_then(Related::into_single).unwrap();
        assert_eq!(readiness.readiness_score, Some(72.0));
    }

    #[test]
    fn deserializes_empty_readiness_list_as_absent() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"PayLink","readiness":[]}"#).unwrap();
        assert!(product.readiness.and_then(Related::into_single).is_none());
    }

    #[test]
    fn deserializes_null_and_missing_related_fields() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"PayLink","prediction":null}"#).unwrap();
        assert!(product.readiness.is_none());
        assert!(product.prediction.is_none());
        assert!(product.revenue_target.is_none());
    }

    #[test]
    fn prediction_defaults_missing_probabilities_to_zero() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p1","name":"PayLink","prediction":{"failure_risk":0.3}}"#,
        )
        .unwrap();
        let prediction = product.prediction.and_then(Related::into_single).unwrap();
        assert!((prediction.failure_risk - 0.3).abs() < f64::EPSILON);
        assert!(prediction.success_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn risk_band_labels_are_exact() {
        assert_eq!(RiskBand::from_label("high"), Some(RiskBand::High));
        assert_eq!(RiskBand::from_label("High"), None);
        assert_eq!(RiskBand::Medium.to_string(), "medium");
    }

    #[test]
    fn lifecycle_stages_follow_canonical_order() {
        let labels: Vec<&str> = LifecycleStage::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            vec!["concept", "early_pilot", "pilot", "commercial", "sunset"]
        );
        assert!(LifecycleStage::Pilot < LifecycleStage::Commercial);
        assert_eq!(LifecycleStage::Sunset.position(), 4);
        assert_eq!(
            LifecycleStage::from_label("early_pilot"),
            Some(LifecycleStage::EarlyPilot)
        );
    }

    #[test]
    fn normalized_accessors_distinguish_absent_from_zero() {
        let mut product = NormalizedProduct {
            id: "p1".to_string(),
            name: "PayLink".to_string(),
            ..NormalizedProduct::default()
        };
        assert_eq!(product.readiness_score(), None);
        assert!(product.readiness_score_or_zero().abs() < f64::EPSILON);

        product.readiness = Some(Readiness {
            readiness_score: Some(0.0),
            risk_band: Some("severe".to_string()),
        });
        assert_eq!(product.readiness_score(), Some(0.0));
        assert_eq!(product.risk_band_label(), Some("severe"));
        assert_eq!(product.risk_band(), None);
    }
}
