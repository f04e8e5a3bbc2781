//! `export` command: write the filtered set as CSV or XLSX.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use portfolio_core::{FilterState, NormalizedProduct};
use portfolio_pipeline::{export_filtered, filter_products, ExportFormat};

/// Default export file name, e.g. `portfolio-20250301-093000.csv`.
pub(crate) fn default_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "portfolio-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Filters `products`, serializes them and writes the file.
///
/// The file goes to `output` when given, otherwise to a timestamped name
/// inside `export_dir`. Returns the path written.
///
/// # Errors
///
/// Returns an error if nothing matches the filters, serialization fails, or
/// the file cannot be written.
pub(crate) fn run_export(
    products: &[NormalizedProduct],
    filters: &FilterState,
    format: ExportFormat,
    output: Option<&Path>,
    export_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let filtered = filter_products(products, filters);
    let bytes = export_filtered(&filtered, format)?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => export_dir.join(default_file_name(format, Utc::now())),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &bytes)?;

    tracing::info!(
        rows = filtered.len(),
        %format,
        path = %path.display(),
        "export written"
    );
    Ok(path)
}
