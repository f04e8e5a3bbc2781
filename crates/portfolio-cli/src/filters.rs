//! Shared filter flags for read-side commands.

use clap::Args;
use portfolio_core::{FilterError, FilterState, Selection};

/// Filter criteria. `--filter-query` seeds the state from a dashboard query
/// string; individual flags then override single criteria.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive substring of the product name
    #[arg(long)]
    pub search: Option<String>,
    /// Product type, or "all"
    #[arg(long = "type")]
    pub product_type: Option<String>,
    /// Lifecycle stage, or "all"
    #[arg(long)]
    pub stage: Option<String>,
    /// Risk band, or "all"
    #[arg(long)]
    pub risk: Option<String>,
    /// Region, or "all"
    #[arg(long)]
    pub region: Option<String>,
    /// Governance tier, or "all"
    #[arg(long)]
    pub tier: Option<String>,
    /// Inclusive lower readiness bound (0-100)
    #[arg(long)]
    pub min_readiness: Option<f64>,
    /// Inclusive upper readiness bound (0-100)
    #[arg(long)]
    pub max_readiness: Option<f64>,
    /// Dashboard query string, e.g. "region=emea&readinessMin=40"
    #[arg(long)]
    pub filter_query: Option<String>,
}

impl FilterArgs {
    /// Resolve the flags into a validated [`FilterState`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the query string is malformed or the
    /// resulting readiness range is invalid.
    pub fn to_filter_state(&self) -> Result<FilterState, FilterError> {
        let mut state = match &self.filter_query {
            Some(query) => FilterState::from_query_string(query)?,
            None => FilterState::default(),
        };

        if let Some(search) = &self.search {
            state.search.clone_from(search);
        }
        let selections = [
            (&self.product_type, &mut state.product_type),
            (&self.stage, &mut state.lifecycle_stage),
            (&self.risk, &mut state.risk_band),
            (&self.region, &mut state.region),
            (&self.tier, &mut state.governance_tier),
        ];
        for (flag, selection) in selections {
            if let Some(value) = flag {
                *selection = Selection::parse(value);
            }
        }
        if let Some(min) = self.min_readiness {
            state.readiness_min = min;
        }
        if let Some(max) = self.max_readiness {
            state.readiness_max = max;
        }

        state.validate()?;
        Ok(state)
    }
}
