use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CatalogError, FeedbackItem, Product, ProductAction};

/// A snapshot of everything the dashboard reads from the catalog service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub feedback: Vec<FeedbackItem>,
    pub actions: Vec<ProductAction>,
}

/// Load a catalog snapshot from a JSON file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or is not a valid snapshot.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_empty_catalog() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.products.is_empty());
        assert!(catalog.feedback.is_empty());
        assert!(catalog.actions.is_empty());
    }

    #[test]
    fn load_catalog_from_sample_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
            .join("catalog.json");
        let catalog = load_catalog(&path).expect("sample catalog should load");
        assert!(!catalog.products.is_empty());
        assert!(!catalog.feedback.is_empty());
        assert!(!catalog.actions.is_empty());
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
