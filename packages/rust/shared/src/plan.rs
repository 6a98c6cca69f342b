//! Catalog items, build plans, and scaffold plans.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Persona, Platform};

// ---------------------------------------------------------------------------
// Catalog items
// ---------------------------------------------------------------------------

/// Atomic-design level of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogItemType {
    Atom,
    Molecule,
    Organism,
    Block,
}

/// A single UI building block from the component catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: CatalogItemType,
    pub variant_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogItem {
    /// Whether the id or any tag names the given keyword.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.id.contains(keyword) || self.tags.iter().any(|t| t.contains(keyword))
    }
}

// ---------------------------------------------------------------------------
// Build targets and adapters
// ---------------------------------------------------------------------------

/// Which application family a build plan targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// Marketing site plus ERP back-office.
    #[default]
    Hybrid,
    Erp,
    Marketing,
}

impl BuildTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Erp => "erp",
            Self::Marketing => "marketing",
        }
    }
}

impl std::fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuildTarget {
    type Err = crate::AppForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hybrid" => Ok(Self::Hybrid),
            "erp" => Ok(Self::Erp),
            "marketing" => Ok(Self::Marketing),
            other => Err(crate::AppForgeError::validation(format!(
                "unknown build target '{other}': expected hybrid, erp, or marketing"
            ))),
        }
    }
}

/// UI component library an app is rendered with downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiAdapter {
    Shadcn,
    Antd,
}

impl UiAdapter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shadcn => "shadcn",
            Self::Antd => "antd",
        }
    }
}

/// Atom kinds the composer recognizes by catalog id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AtomKind {
    Button,
    TextField,
    Select,
}

impl AtomKind {
    pub const ALL: [AtomKind; 3] = [Self::Button, Self::TextField, Self::Select];

    /// Catalog id prefix identifying this atom kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::TextField => "textField",
            Self::Select => "select",
        }
    }

    /// Resolve an atom kind from a catalog item id.
    pub fn from_item_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| id.starts_with(k.id_prefix()))
    }
}

// ---------------------------------------------------------------------------
// BuildPlan
// ---------------------------------------------------------------------------

/// One application inside a build plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPlan {
    pub name: String,
    pub adapter: UiAdapter,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<String>,
}

/// Block ids grouped by app family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSets {
    #[serde(default)]
    pub marketing: Vec<String>,
    #[serde(default)]
    pub erp: Vec<String>,
}

/// A concrete route produced by the route generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub app: String,
    pub page: String,
}

/// Platform-targeted output of composition, ready for downstream generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub target: BuildTarget,
    pub persona: Persona,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub apps: Vec<AppPlan>,
    #[serde(default)]
    pub atoms: BTreeMap<AtomKind, String>,
    #[serde(default)]
    pub blocks: BlockSets,
    /// Named UI components requested by the product spec.
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl BuildPlan {
    /// Total number of pages across all apps.
    pub fn page_count(&self) -> usize {
        self.apps.iter().map(|a| a.pages.len()).sum()
    }

    /// Atoms, named components, and app blocks counted together.
    pub fn component_count(&self) -> usize {
        self.atoms.len()
            + self.components.len()
            + self.apps.iter().map(|a| a.blocks.len()).sum::<usize>()
    }

    /// Whether a component with this name is present (case-insensitive).
    pub fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c.eq_ignore_ascii_case(name))
    }
}

// ---------------------------------------------------------------------------
// ScaffoldPlan
// ---------------------------------------------------------------------------

/// Files and dependencies a project writer intends to emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldPlan {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}
