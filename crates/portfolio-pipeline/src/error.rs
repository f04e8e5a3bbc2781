use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The filtered set is empty; an empty file would look like a failed fetch.
    #[error("nothing to export: no products match the current filters")]
    NothingToExport,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("workbook archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("export output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
