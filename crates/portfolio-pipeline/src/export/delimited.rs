use csv::{Terminator, WriterBuilder};
use portfolio_core::NormalizedProduct;

use super::{flatten, EXPORT_COLUMNS};
use crate::error::ExportError;

/// Writes `products` as CSV: header row first, one row per product, `\n`
/// line endings. Empty input produces the header row alone.
///
/// # Errors
///
/// Returns [`ExportError`] if the writer fails to encode a record.
pub fn to_csv(products: &[NormalizedProduct]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS)?;
    for product in products {
        writer.write_record(flatten(product).iter().map(super::Cell::render))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
