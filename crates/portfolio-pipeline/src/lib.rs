//! Pure, synchronous derivations over the product catalog: normalization,
//! filtering, aggregation, ordering, export and the governance, data-health,
//! feedback and what-if analyses built on them.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod feedback;
pub mod filter;
pub mod governance;
pub mod health;
pub mod normalize;
pub mod sort;
pub mod whatif;

/// Group and category key for products with no value in the keyed field.
pub const UNASSIGNED: &str = "unassigned";

pub use aggregate::{aggregate, PortfolioMetrics, PortfolioSummary};
pub use error::ExportError;
pub use export::{export_filtered, to_csv, to_sheet, ExportFormat, EXPORT_COLUMNS};
pub use feedback::{feedback_for_product, summarize_feedback, FeedbackSummary};
pub use filter::{filter_products, matches};
pub use governance::{default_rules, evaluate, GovernanceFinding, GovernanceRule, Severity};
pub use health::{data_health_report, score_data_health, DataHealth, DataHealthReport};
pub use normalize::{normalize_product, normalize_products};
pub use sort::{group_products, sort_products, GroupKey, ProductGroup, SortDirection, SortKey};
pub use whatif::{project, WhatIfAdjustment, WhatIfProjection};
