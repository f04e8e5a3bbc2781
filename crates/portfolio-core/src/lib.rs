//! Shared data model and configuration for the portfolio dashboard tooling.

pub mod actions;
pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod filters;
pub mod governance;
pub mod products;

pub use actions::{count_by_status, ActionStatus, ProductAction};
pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, Catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ActionError, CatalogError, ConfigError, FilterError};
pub use feedback::{FeedbackItem, Impact, Sentiment};
pub use filters::{FilterState, Selection};
pub use governance::{load_governance_config, GovernanceConfig};
pub use products::{
    LifecycleStage, NormalizedProduct, Prediction, Product, Readiness, Related, RiskBand,
};
