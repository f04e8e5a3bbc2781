//! Flattening of normalized products into the fixed export column schema,
//! and the CSV and workbook serializers built on it.

pub mod delimited;
pub mod workbook;

use std::fmt;
use std::str::FromStr;

use portfolio_core::NormalizedProduct;

use crate::error::ExportError;

pub use delimited::to_csv;
pub use workbook::{to_sheet, SHEET_NAME};

/// Export header row. Column order is part of the file format.
pub const EXPORT_COLUMNS: [&str; 16] = [
    "id",
    "name",
    "product_type",
    "region",
    "lifecycle_stage",
    "governance_tier",
    "readiness_score",
    "risk_band",
    "success_probability",
    "failure_risk",
    "revenue_target",
    "owner_email",
    "budget_code",
    "pii_flag",
    "gating_status",
    "success_metric",
];

/// One exported value. `Empty` is written as an empty CSV field or an
/// omitted workbook cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn text(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, |s| Cell::Text(s.to_string()))
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    /// Plain-text rendering used by the CSV writer.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Flattens one product into cells aligned with [`EXPORT_COLUMNS`].
#[must_use]
pub fn flatten(product: &NormalizedProduct) -> [Cell; EXPORT_COLUMNS.len()] {
    [
        Cell::Text(product.id.clone()),
        Cell::Text(product.name.clone()),
        Cell::text(product.product_type.as_deref()),
        Cell::text(product.region.as_deref()),
        Cell::text(product.lifecycle_stage.as_deref()),
        Cell::text(product.governance_tier.as_deref()),
        Cell::number(product.readiness_score()),
        Cell::text(product.risk_band_label()),
        Cell::number(product.success_probability()),
        Cell::number(product.failure_risk()),
        Cell::number(product.revenue_target),
        Cell::text(product.owner_email.as_deref()),
        Cell::text(product.budget_code.as_deref()),
        product.pii_flag.map_or(Cell::Empty, Cell::Bool),
        Cell::text(product.gating_status.as_deref()),
        Cell::text(product.success_metric.as_deref()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unknown export format '{other}' (expected csv or xlsx)")),
        }
    }
}

/// Serializes the filtered set as the user-facing export action.
///
/// Unlike [`to_csv`] and [`to_sheet`], which happily write a header-only
/// file, this refuses an empty set.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] when `products` is empty, or the
/// underlying serializer error.
pub fn export_filtered(
    products: &[NormalizedProduct],
    format: ExportFormat,
) -> Result<Vec<u8>, ExportError> {
    if products.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    tracing::debug!(rows = products.len(), %format, "serializing export");
    match format {
        ExportFormat::Csv => Ok(to_csv(products)?.into_bytes()),
        ExportFormat::Xlsx => to_sheet(products),
    }
}
