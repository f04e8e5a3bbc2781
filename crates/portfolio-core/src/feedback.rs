use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// Any label outside the controlled vocabulary.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

/// One piece of customer, partner or internal feedback linked to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    /// Product display name as recorded with the feedback.
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub product_id: String,
    /// Free-text category, e.g. `"onboarding"` or `"fees"`.
    #[serde(default)]
    pub theme: String,
    pub sentiment: Sentiment,
    /// Either `[0, 1]` or signed `[-1, 1]` depending on the producer.
    #[serde(default)]
    pub sentiment_score: f64,
    /// Number of mentions this item stands for.
    #[serde(default)]
    pub volume: u32,
    pub impact: Impact,
    #[serde(default)]
    pub source: Option<String>,
}
