//! Sentiment and theme rollups over product feedback.

use std::collections::HashMap;

use portfolio_core::{FeedbackItem, Impact, Sentiment};
use serde::Serialize;

use crate::aggregate::mean;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    /// Items whose sentiment label was outside the known vocabulary.
    pub unknown: u64,
}

impl SentimentCounts {
    fn add(&mut self, sentiment: Sentiment, mentions: u64) {
        match sentiment {
            Sentiment::Positive => self.positive += mentions,
            Sentiment::Negative => self.negative += mentions,
            Sentiment::Neutral => self.neutral += mentions,
            Sentiment::Unknown => self.unknown += mentions,
        }
    }

    /// Sentiment with the most mentions. Ties resolve toward negative, then
    /// neutral, then positive.
    fn dominant(&self) -> Sentiment {
        [
            (Sentiment::Negative, self.negative),
            (Sentiment::Neutral, self.neutral),
            (Sentiment::Positive, self.positive),
        ]
        .into_iter()
        .fold((Sentiment::Unknown, 0), |best, (sentiment, count)| {
            if count > best.1 {
                (sentiment, count)
            } else {
                best
            }
        })
        .0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSummary {
    pub theme: String,
    /// Sum of `volume` across items with this theme.
    pub mentions: u64,
    pub items: usize,
    pub mean_sentiment_score: f64,
    pub dominant_sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total_mentions: u64,
    pub by_sentiment: SentimentCounts,
    pub high_impact_items: usize,
    /// Ordered by mentions descending, then theme name.
    pub themes: Vec<ThemeSummary>,
}

#[must_use]
pub fn summarize_feedback(items: &[FeedbackItem]) -> FeedbackSummary {
    let mut by_sentiment = SentimentCounts::default();
    let mut themes: HashMap<&str, (SentimentCounts, Vec<f64>, u64)> = HashMap::new();

    for item in items {
        let mentions = u64::from(item.volume);
        by_sentiment.add(item.sentiment, mentions);

        let entry = themes.entry(item.theme.as_str()).or_default();
        entry.0.add(item.sentiment, mentions);
        entry.1.push(item.sentiment_score);
        entry.2 += mentions;
    }

    let mut themes: Vec<ThemeSummary> = themes
        .into_iter()
        .map(|(theme, (counts, scores, mentions))| ThemeSummary {
            theme: theme.to_string(),
            mentions,
            items: scores.len(),
            mean_sentiment_score: mean(scores),
            dominant_sentiment: counts.dominant(),
        })
        .collect();
    themes.sort_by(|a, b| b.mentions.cmp(&a.mentions).then_with(|| a.theme.cmp(&b.theme)));

    FeedbackSummary {
        total_mentions: items.iter().map(|i| u64::from(i.volume)).sum(),
        by_sentiment,
        high_impact_items: items.iter().filter(|i| i.impact == Impact::High).count(),
        themes,
    }
}

/// Feedback recorded against `product_id`, in input order.
#[must_use]
pub fn feedback_for_product<'a>(items: &'a [FeedbackItem], product_id: &str) -> Vec<&'a FeedbackItem> {
    items.iter().filter(|i| i.product_id == product_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(product_id: &str, theme: &str, sentiment: Sentiment, volume: u32) -> FeedbackItem {
        FeedbackItem {
            product: "Product".to_string(),
            product_id: product_id.to_string(),
            theme: theme.to_string(),
            sentiment,
            sentiment_score: 0.5,
            volume,
            impact: Impact::Low,
            source: None,
        }
    }

    #[test]
    fn empty_feedback_summarizes_to_zero() {
        let summary = summarize_feedback(&[]);
        assert_eq!(summary.total_mentions, 0);
        assert_eq!(summary.by_sentiment, SentimentCounts::default());
        assert!(summary.themes.is_empty());
    }

    #[test]
    fn mentions_are_weighted_by_volume() {
        let items = vec![
            make_item("p1", "fees", Sentiment::Negative, 12),
            make_item("p1", "fees", Sentiment::Positive, 3),
            make_item("p2", "onboarding", Sentiment::Positive, 20),
        ];
        let summary = summarize_feedback(&items);
        assert_eq!(summary.total_mentions, 35);
        assert_eq!(summary.by_sentiment.positive, 23);
        assert_eq!(summary.by_sentiment.negative, 12);
    }

    #[test]
    fn themes_sorted_by_mentions_then_name() {
        let items = vec![
            make_item("p1", "fees", Sentiment::Negative, 5),
            make_item("p1", "api", Sentiment::Neutral, 5),
            make_item("p1", "onboarding", Sentiment::Positive, 9),
        ];
        let summary = summarize_feedback(&items);
        let order: Vec<&str> = summary.themes.iter().map(|t| t.theme.as_str()).collect();
        assert_eq!(order, vec!["onboarding", "api", "fees"]);
    }

    #[test]
    fn dominant_sentiment_per_theme() {
        let mut items = vec![
            make_item("p1", "fees", Sentiment::Negative, 10),
            make_item("p1", "fees", Sentiment::Positive, 4),
        ];
        items[1].sentiment_score = 0.9;
        items[0].sentiment_score = 0.1;
        let summary = summarize_feedback(&items);
        let fees = &summary.themes[0];
        assert_eq!(fees.dominant_sentiment, Sentiment::Negative);
        assert_eq!(fees.items, 2);
        assert!((fees.mean_sentiment_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn counts_high_impact_items() {
        let mut items = vec![
            make_item("p1", "fees", Sentiment::Negative, 1),
            make_item("p1", "fees", Sentiment::Negative, 1),
        ];
        items[0].impact = Impact::High;
        assert_eq!(summarize_feedback(&items).high_impact_items, 1);
    }

    #[test]
    fn filters_by_product() {
        let items = vec![
            make_item("p1", "fees", Sentiment::Negative, 1),
            make_item("p2", "fees", Sentiment::Negative, 1),
            make_item("p1", "api", Sentiment::Neutral, 1),
        ];
        let for_p1 = feedback_for_product(&items, "p1");
        assert_eq!(for_p1.len(), 2);
        assert_eq!(for_p1[1].theme, "api");
    }
}
