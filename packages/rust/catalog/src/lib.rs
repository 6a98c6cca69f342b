//! Component catalog loading and retrieval.
//!
//! A catalog directory holds either one pre-merged `index.json` or a set of
//! per-category files (`atoms.json`, `molecules.json`, `organisms.json`,
//! `blocks.json`). Loading walks an explicit fallback chain:
//!
//! 1. unified index
//! 2. per-category files, each failure logged and skipped
//! 3. built-in inline atoms/blocks for categories that are still missing
//!
//! Failures shrink the result set; they only abort when no data at all is
//! available and built-in defaults are disabled.

mod defaults;
mod loader;
mod retrieve;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use appforge_shared::CatalogItem;

pub use defaults::{builtin_atoms, builtin_blocks};
pub use loader::{load_category, load_index, load_unified_index};
pub use retrieve::{ATOM_LIMIT, RetrievalOptions, Retrieved, retrieve_from_catalog, select_items};

/// File name of the pre-merged catalog index.
pub const UNIFIED_INDEX_FILE: &str = "index.json";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single catalog file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    /// The file does not exist.
    #[error("catalog file not found: {path:?}")]
    Missing { path: PathBuf },

    /// The file exists but could not be read.
    #[error("cannot read catalog file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid catalog JSON.
    #[error("malformed catalog file {path:?}: {message}")]
    Malformed { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Categories and index
// ---------------------------------------------------------------------------

/// Per-category catalog files used when no unified index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogCategory {
    Atoms,
    Molecules,
    Organisms,
    Blocks,
}

impl CatalogCategory {
    pub const ALL: [CatalogCategory; 4] = [Self::Atoms, Self::Molecules, Self::Organisms, Self::Blocks];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Atoms => "atoms.json",
            Self::Molecules => "molecules.json",
            Self::Organisms => "organisms.json",
            Self::Blocks => "blocks.json",
        }
    }
}

/// On-disk shape of `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedIndex {
    #[serde(default)]
    pub version: u32,
    pub items: Vec<CatalogItem>,
}

/// Where the items of a [`CatalogIndex`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IndexSource {
    Unified,
    PerCategory {
        loaded: Vec<CatalogCategory>,
        failed: Vec<CatalogCategory>,
    },
}

/// Catalog items in file iteration order, plus their provenance.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    pub source: IndexSource,
    pub items: Vec<CatalogItem>,
}

impl CatalogIndex {
    /// Whether a category is absent from a per-category load.
    pub fn is_missing(&self, category: CatalogCategory) -> bool {
        match &self.source {
            IndexSource::Unified => false,
            IndexSource::PerCategory { loaded, .. } => !loaded.contains(&category),
        }
    }
}
