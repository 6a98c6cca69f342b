//! Inline catalog entries used when catalog files are missing.

use appforge_shared::{CatalogItem, CatalogItemType};

fn item(id: &str, item_type: CatalogItemType, variant_id: &str, tags: &[&str]) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        item_type,
        variant_id: variant_id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn builtin_atoms() -> Vec<CatalogItem> {
    use CatalogItemType::Atom;
    vec![
        item("button-primary", Atom, "primary", &["interactive"]),
        item("textField-outlined", Atom, "outlined", &["form", "interactive"]),
        item("select-native", Atom, "native", &["form", "interactive"]),
    ]
}

pub fn builtin_blocks() -> Vec<CatalogItem> {
    use CatalogItemType::Block;
    vec![
        item("marketing-hero-split", Block, "split", &["marketing", "landing"]),
        item("pricing-three-tier", Block, "three-tier", &["marketing", "pricing"]),
        item("erp-sidebar-nav", Block, "sidebar", &["erp", "navigation"]),
        item("erp-kpi-strip", Block, "kpi", &["erp", "dashboard"]),
    ]
}
