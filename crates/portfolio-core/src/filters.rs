//! The filter criteria shared between the filter controls and the pipeline.
//!
//! A [`FilterState`] is plain data: it serializes to JSON with camelCase keys
//! and round-trips through a URL query string so the surrounding application
//! can persist it in the address bar or local storage.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::FilterError;

/// Sentinel that disables a categorical criterion.
pub const ALL: &str = "all";

pub const READINESS_FLOOR: f64 = 0.0;
pub const READINESS_CEILING: f64 = 100.0;

/// Unreserved characters (RFC 3986) stay literal; everything else is encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A categorical criterion: either the `"all"` sentinel or one exact code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    /// `true` if a product whose field holds `value` passes this criterion.
    /// Comparison is exact and case-sensitive.
    #[must_use]
    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Only(value) => value,
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value)
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Only(value) => value,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete set of active filter criteria. Replaced wholesale on every
/// edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Case-insensitive substring matched against the product name.
    pub search: String,
    pub product_type: Selection,
    pub lifecycle_stage: Selection,
    pub risk_band: Selection,
    pub region: Selection,
    pub governance_tier: Selection,
    /// Inclusive lower readiness bound.
    pub readiness_min: f64,
    /// Inclusive upper readiness bound.
    pub readiness_max: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            product_type: Selection::All,
            lifecycle_stage: Selection::All,
            risk_band: Selection::All,
            region: Selection::All,
            governance_tier: Selection::All,
            readiness_min: READINESS_FLOOR,
            readiness_max: READINESS_CEILING,
        }
    }
}

impl FilterState {
    /// Check the readiness bounds.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::OutOfRange`] if a bound is outside `0..=100`
    /// and [`FilterError::InvertedRange`] if `readiness_min > readiness_max`.
    pub fn validate(&self) -> Result<(), FilterError> {
        for value in [self.readiness_min, self.readiness_max] {
            if !(READINESS_FLOOR..=READINESS_CEILING).contains(&value) {
                return Err(FilterError::OutOfRange { value });
            }
        }
        if self.readiness_min > self.readiness_max {
            return Err(FilterError::InvertedRange {
                min: self.readiness_min,
                max: self.readiness_max,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn has_default_range(&self) -> bool {
        self.readiness_min <= READINESS_FLOOR && self.readiness_max >= READINESS_CEILING
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of criteria that currently narrow the result. The readiness
    /// range counts once.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let categorical = self
            .selections()
            .iter()
            .filter(|(_, selection)| !selection.is_all())
            .count();
        categorical + usize::from(!self.search.is_empty()) + usize::from(!self.has_default_range())
    }

    fn selections(&self) -> [(&'static str, &Selection); 5] {
        [
            ("productType", &self.product_type),
            ("lifecycleStage", &self.lifecycle_stage),
            ("riskBand", &self.risk_band),
            ("region", &self.region),
            ("governanceTier", &self.governance_tier),
        ]
    }

    /// Encode the non-default criteria as `key=value` pairs joined by `&`.
    /// The default state encodes to an empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        for (key, selection) in self.selections() {
            if let Selection::Only(value) = selection {
                pairs.push((key, value.clone()));
            }
        }
        if self.readiness_min > READINESS_FLOOR {
            pairs.push(("readinessMin", self.readiness_min.to_string()));
        }
        if self.readiness_max < READINESS_CEILING {
            pairs.push(("readinessMax", self.readiness_max.to_string()));
        }

        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", utf8_percent_encode(&value, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode a query string produced by [`FilterState::to_query_string`]
    /// (a leading `?` is accepted, `+` reads as a space, unknown keys are
    /// ignored) and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParam`] for undecodable values or
    /// non-numeric readiness bounds, and the [`FilterState::validate`] errors
    /// for bad ranges.
    pub fn from_query_string(query: &str) -> Result<Self, FilterError> {
        let mut state = FilterState::default();

        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(raw_key, raw_key)?;
            let value = decode_component(raw_value, &key)?;

            match key.as_str() {
                "search" => state.search = value,
                "productType" => state.product_type = Selection::from(value),
                "lifecycleStage" => state.lifecycle_stage = Selection::from(value),
                "riskBand" => state.risk_band = Selection::from(value),
                "region" => state.region = Selection::from(value),
                "governanceTier" => state.governance_tier = Selection::from(value),
                "readinessMin" => state.readiness_min = parse_bound(&key, &value)?,
                "readinessMax" => state.readiness_max = parse_bound(&key, &value)?,
                _ => {}
            }
        }

        state.validate()?;
        Ok(state)
    }
}

fn decode_component(raw: &str, key: &str) -> Result<String, FilterError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| FilterError::InvalidParam {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bound(key: &str, value: &str) -> Result<f64, FilterError> {
    value.parse::<f64>().map_err(|e| FilterError::InvalidParam {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unfiltered() {
        let state = FilterState::default();
        assert!(state.is_default());
        assert_eq!(state.active_count(), 0);
        assert!(state.validate().is_ok());
        assert_eq!(state.to_query_string(), "");
    }

    #[test]
    fn selection_all_admits_anything() {
        assert!(Selection::All.admits(None));
        assert!(Selection::All.admits(Some("emea")));
    }

    #[test]
    fn selection_only_is_exact_and_case_sensitive() {
        let selection = Selection::parse("emea");
        assert!(selection.admits(Some("emea")));
        assert!(!selection.admits(Some("EMEA")));
        assert!(!selection.admits(None));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let state = FilterState {
            readiness_min: 80.0,
            readiness_max: 20.0,
            ..FilterState::default()
        };
        assert_eq!(
            state.validate(),
            Err(FilterError::InvertedRange {
                min: 80.0,
                max: 20.0
            })
        );
    }

    #[test]
    fn validate_rejects_out_of_range_bound() {
        let state = FilterState {
            readiness_max: 120.0,
            ..FilterState::default()
        };
        assert_eq!(
            state.validate(),
            Err(FilterError::OutOfRange { value: 120.0 })
        );
    }

    #[test]
    fn active_count_counts_range_once() {
        let state = FilterState {
            search: "pay".to_string(),
            region: Selection::parse("emea"),
            readiness_min: 10.0,
            readiness_max: 90.0,
            ..FilterState::default()
        };
        assert_eq!(state.active_count(), 3);
        assert!(!state.is_default());
    }

    #[test]
    fn json_uses_camel_case_and_all_sentinel() {
        let state = FilterState {
            product_type: Selection::parse("payments"),
            ..FilterState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["productType"], "payments");
        assert_eq!(json["region"], "all");
        assert_eq!(json["readinessMax"], 100.0);

        let decoded: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn json_missing_keys_fall_back_to_defaults() {
        let decoded: FilterState = serde_json::from_str(r#"{"riskBand":"high"}"#).unwrap();
        assert_eq!(decoded.risk_band, Selection::parse("high"));
        assert_eq!(decoded.lifecycle_stage, Selection::All);
        assert!((decoded.readiness_max - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn query_string_encodes_only_active_criteria() {
        let state = FilterState {
            search: "pay link".to_string(),
            lifecycle_stage: Selection::parse("early_pilot"),
            readiness_min: 40.0,
            ..FilterState::default()
        };
        assert_eq!(
            state.to_query_string(),
            "search=pay%20link&lifecycleStage=early_pilot&readinessMin=40"
        );
    }

    #[test]
    fn query_string_round_trips() {
        let state = FilterState {
            search: "A&B / C".to_string(),
            governance_tier: Selection::parse("tier_1"),
            readiness_min: 12.5,
            readiness_max: 75.0,
            ..FilterState::default()
        };
        let decoded = FilterState::from_query_string(&state.to_query_string()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn from_query_string_accepts_form_style_input() {
        let decoded =
            FilterState::from_query_string("?search=pay+link&region=emea&utm_source=x").unwrap();
        assert_eq!(decoded.search, "pay link");
        assert_eq!(decoded.region, Selection::parse("emea"));
    }

    #[test]
    fn from_query_string_rejects_non_numeric_bound() {
        let err = FilterState::from_query_string("readinessMin=abc").unwrap_err();
        assert!(matches!(err, FilterError::InvalidParam { ref key, .. } if key == "readinessMin"));
    }

    #[test]
    fn from_query_string_rejects_inverted_bounds() {
        let err = FilterState::from_query_string("readinessMin=90&readinessMax=10").unwrap_err();
        assert!(matches!(err, FilterError::InvertedRange { .. }));
    }
}
