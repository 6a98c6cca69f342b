//! Target-aware selection of catalog items.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use appforge_shared::{AppForgeError, BuildTarget, CatalogItem, CatalogItemType, ProductSpec};

use crate::defaults::{builtin_atoms, builtin_blocks};
use crate::loader::load_index;
use crate::{CatalogCategory, IndexSource};

/// Atoms are taken in index order, up to this many. No relevance ranking.
pub const ATOM_LIMIT: usize = 10;

/// Knobs for [`retrieve_from_catalog`].
#[derive(Debug, Clone, Copy)]
pub struct RetrievalOptions {
    /// Substitute inline atoms/blocks for categories that failed to load or are empty.
    pub builtin_defaults: bool,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            builtin_defaults: true,
        }
    }
}

/// Selected catalog items and the provenance of the index they came from.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieved {
    pub items: Vec<CatalogItem>,
    pub source: IndexSource,
}

fn block_wanted(item: &CatalogItem, target: BuildTarget) -> bool {
    match target {
        BuildTarget::Hybrid => item.mentions("marketing") || item.mentions("erp"),
        BuildTarget::Marketing => item.mentions("marketing"),
        BuildTarget::Erp => item.mentions("erp"),
    }
}

/// Pick the first [`ATOM_LIMIT`] atoms and the blocks relevant to `target`.
///
/// Molecules and organisms are not selected.
pub fn select_items(items: &[CatalogItem], target: BuildTarget) -> Vec<CatalogItem> {
    let atoms = items
        .iter()
        .filter(|i| i.item_type == CatalogItemType::Atom)
        .take(ATOM_LIMIT);
    let blocks = items
        .iter()
        .filter(|i| i.item_type == CatalogItemType::Block && block_wanted(i, target));

    atoms.chain(blocks).cloned().collect()
}

/// Load the catalog at `dir` and select items for `target`.
///
/// Built-in atoms and blocks fill in for a category that failed to load or
/// has no items. Only fails when the catalog yields nothing and built-in
/// defaults are off.
#[instrument(skip_all, fields(app = %spec.app.name, target = %target))]
pub async fn retrieve_from_catalog(
    dir: &Path,
    spec: &ProductSpec,
    target: BuildTarget,
    options: RetrievalOptions,
) -> appforge_shared::Result<Retrieved> {
    let index = load_index(dir).await;
    let mut items = index.items.clone();

    if options.builtin_defaults {
        let has = |kind: CatalogItemType| items.iter().any(|i| i.item_type == kind);
        let (has_atoms, has_blocks) = (has(CatalogItemType::Atom), has(CatalogItemType::Block));
        if index.is_missing(CatalogCategory::Atoms) || !has_atoms {
            debug!("no atoms in catalog, using built-in atoms");
            items.extend(builtin_atoms());
        }
        if index.is_missing(CatalogCategory::Blocks) || !has_blocks {
            debug!("no blocks in catalog, using built-in blocks");
            items.extend(builtin_blocks());
        }
    } else if items.is_empty() {
        return Err(AppForgeError::CatalogUnavailable(format!(
            "no catalog items under {} and built-in defaults are disabled",
            dir.display()
        )));
    }

    let selected = select_items(&items, target);
    info!(
        available = items.len(),
        selected = selected.len(),
        "catalog items retrieved"
    );

    Ok(Retrieved {
        items: selected,
        source: index.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn spec() -> ProductSpec {
        ProductSpec::from_json(r#"{"app": {"name": "Retrieval Test"}}"#).unwrap()
    }

    fn temp_catalog() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("appforge_retrieve_{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("create temp catalog dir");
        dir
    }

    fn ids(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn hybrid_takes_first_ten_atoms_and_both_block_families() {
        let retrieved = retrieve_from_catalog(
            Path::new("../../../catalog"),
            &spec(),
            BuildTarget::Hybrid,
            RetrievalOptions::default(),
        )
        .await
        .unwrap();

        let atoms: Vec<_> = retrieved
            .items
            .iter()
            .filter(|i| i.item_type == CatalogItemType::Atom)
            .collect();
        assert_eq!(atoms.len(), ATOM_LIMIT);
        assert_eq!(atoms[0].id, "button-primary");
        assert_eq!(atoms[9].id, "avatar-round");
        assert!(!ids(&retrieved.items).contains(&"tooltip-dark"));

        let blocks: Vec<_> = retrieved
            .items
            .iter()
            .filter(|i| i.item_type == CatalogItemType::Block)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(blocks.len(), 8);
        assert!(blocks.contains(&"marketing-hero-split"));
        assert!(blocks.contains(&"approval-inbox"));
        assert!(!blocks.contains(&"blog-list"));
        assert_eq!(retrieved.source, IndexSource::Unified);
    }

    #[tokio::test]
    async fn erp_target_skips_marketing_blocks() {
        let retrieved = retrieve_from_catalog(
            Path::new("../../../catalog"),
            &spec(),
            BuildTarget::Erp,
            RetrievalOptions::default(),
        )
        .await
        .unwrap();

        for item in retrieved.items.iter().filter(|i| i.item_type == CatalogItemType::Block) {
            assert!(item.mentions("erp"), "unexpected block {}", item.id);
        }
    }

    #[test]
    fn molecules_are_never_selected() {
        let items = vec![
            CatalogItem {
                id: "form-row".into(),
                item_type: CatalogItemType::Molecule,
                variant_id: "default".into(),
                tags: vec!["erp".into()],
            },
            CatalogItem {
                id: "erp-kpi-strip".into(),
                item_type: CatalogItemType::Block,
                variant_id: "kpi".into(),
                tags: vec![],
            },
        ];
        assert_eq!(ids(&select_items(&items, BuildTarget::Erp)), vec!["erp-kpi-strip"]);
        assert!(select_items(&items, BuildTarget::Marketing).is_empty());
    }

    #[tokio::test]
    async fn missing_files_fall_back_to_builtin_defaults() {
        let dir = temp_catalog();
        let retrieved =
            retrieve_from_catalog(&dir, &spec(), BuildTarget::Marketing, RetrievalOptions::default())
                .await
                .unwrap();

        assert_eq!(
            ids(&retrieved.items),
            vec![
                "button-primary",
                "textField-outlined",
                "select-native",
                "marketing-hero-split",
                "pricing-three-tier",
            ]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn present_atoms_file_is_not_padded() {
        let dir = temp_catalog();
        std::fs::write(
            dir.join("atoms.json"),
            r#"[{"id": "select-combobox", "type": "atom", "variantId": "combobox"}]"#,
        )
        .unwrap();

        let retrieved =
            retrieve_from_catalog(&dir, &spec(), BuildTarget::Erp, RetrievalOptions::default())
                .await
                .unwrap();
        assert_eq!(
            ids(&retrieved.items),
            vec!["select-combobox", "erp-sidebar-nav", "erp-kpi-strip"]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn empty_unified_index_uses_builtin_defaults() {
        let dir = temp_catalog();
        std::fs::write(dir.join("index.json"), r#"{"version": 1, "items": []}"#).unwrap();

        let retrieved =
            retrieve_from_catalog(&dir, &spec(), BuildTarget::Erp, RetrievalOptions::default())
                .await
                .unwrap();
        assert_eq!(retrieved.source, IndexSource::Unified);
        assert_eq!(
            ids(&retrieved.items),
            vec![
                "button-primary",
                "textField-outlined",
                "select-native",
                "erp-sidebar-nav",
                "erp-kpi-strip",
            ]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn empty_catalog_without_defaults_is_fatal() {
        let dir = temp_catalog();
        let result = retrieve_from_catalog(
            &dir,
            &spec(),
            BuildTarget::Hybrid,
            RetrievalOptions {
                builtin_defaults: false,
            },
        )
        .await;
        assert!(matches!(result, Err(AppForgeError::CatalogUnavailable(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
