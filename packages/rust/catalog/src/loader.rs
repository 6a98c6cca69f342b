//! Catalog file loading with an explicit unified → per-category fallback.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use appforge_shared::CatalogItem;

use crate::{
    CatalogCategory, CatalogIndex, CatalogLoadError, IndexSource, UNIFIED_INDEX_FILE, UnifiedIndex,
};

async fn read_catalog_file(path: &Path) -> Result<String, CatalogLoadError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CatalogLoadError::Missing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CatalogLoadError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load the pre-merged `index.json` from a catalog directory.
pub async fn load_unified_index(dir: &Path) -> Result<CatalogIndex, CatalogLoadError> {
    let path = dir.join(UNIFIED_INDEX_FILE);
    let content = read_catalog_file(&path).await?;
    let index: UnifiedIndex =
        serde_json::from_str(&content).map_err(|e| CatalogLoadError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;

    debug!(path = %path.display(), version = index.version, items = index.items.len(), "unified index loaded");

    Ok(CatalogIndex {
        source: IndexSource::Unified,
        items: index.items,
    })
}

/// Load one per-category file (a JSON array of catalog items).
pub async fn load_category(
    dir: &Path,
    category: CatalogCategory,
) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let path = dir.join(category.file_name());
    let content = read_catalog_file(&path).await?;
    serde_json::from_str(&content).map_err(|e| CatalogLoadError::Malformed {
        path,
        message: e.to_string(),
    })
}

/// Load a catalog directory, preferring the unified index.
///
/// Never fails: unreadable files are logged and contribute no items.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn load_index(dir: &Path) -> CatalogIndex {
    match load_unified_index(dir).await {
        Ok(index) => {
            info!(items = index.items.len(), "using unified catalog index");
            return index;
        }
        Err(CatalogLoadError::Missing { .. }) => {
            debug!("no unified index, loading per-category files");
        }
        Err(e) => {
            warn!(error = %e, "unified index unusable, loading per-category files");
        }
    }

    let mut items = Vec::new();
    let mut loaded = Vec::new();
    let mut failed = Vec::new();

    for category in CatalogCategory::ALL {
        match load_category(dir, category).await {
            Ok(category_items) => {
                debug!(?category, items = category_items.len(), "catalog category loaded");
                items.extend(category_items);
                loaded.push(category);
            }
            Err(e) => {
                warn!(?category, error = %e, "skipping catalog category");
                failed.push(category);
            }
        }
    }

    info!(
        items = items.len(),
        loaded = loaded.len(),
        failed = failed.len(),
        "per-category catalog loaded"
    );

    CatalogIndex {
        source: IndexSource::PerCategory { loaded, failed },
        items,
    }
}
