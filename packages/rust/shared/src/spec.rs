//! The `ProductSpec` document: the structured description of an application
//! that the rules matrix enhances and the composer compiles into a build plan.
//!
//! Specs are produced outside this workspace (usually by an LLM front-end) and
//! arrive as JSON. Field names are camelCase on the wire because rule
//! conditions address them by dotted path (`security.sso`, `app.productType`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DeliveryMode, Platform, ProductType};

/// Application metadata block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMeta {
    /// Display name of the application.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Product type, if the upstream generator resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    /// BCP-47 locale tag of the primary UI language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default)]
    pub rtl: bool,
}

/// Security configuration block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Primary authentication method (e.g. `password`, `magic-link`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(default)]
    pub sso: bool,
    #[serde(default)]
    pub mfa: bool,
    #[serde(default)]
    pub rbac: bool,
    #[serde(default)]
    pub audit_log: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_residency: Option<String>,
}

/// Structured description of a desired application.
///
/// The list fields behave as ordered sets: entries are unique and keep the
/// order of first insertion. `ui_overrides` is a flat key-value map where the
/// last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpec {
    pub app: AppMeta,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub delivery_mode: DeliveryMode,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub ui_components: Vec<String>,
    #[serde(default)]
    pub ui_patterns: Vec<String>,
    #[serde(default)]
    pub ui_overrides: BTreeMap<String, serde_json::Value>,
}

impl ProductSpec {
    /// Return a copy with duplicate set entries removed (first occurrence kept).
    pub fn normalized(&self) -> Self {
        let mut spec = self.clone();
        dedup_in_order(&mut spec.features);
        dedup_in_order(&mut spec.modules);
        dedup_in_order(&mut spec.constraints);
        dedup_in_order(&mut spec.ui_components);
        dedup_in_order(&mut spec.ui_patterns);

        let mut platforms = Vec::with_capacity(spec.platforms.len());
        for p in spec.platforms {
            if !platforms.contains(&p) {
                platforms.push(p);
            }
        }
        spec.platforms = platforms;
        spec
    }

    /// Parse a spec from JSON and normalize it.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let spec: Self = serde_json::from_str(json)
            .map_err(|e| crate::AppForgeError::parse(format!("invalid product spec: {e}")))?;
        Ok(spec.normalized())
    }
}

/// Append each value that is not already present, preserving insertion order.
///
/// Returns the number of values actually added.
pub fn append_unique(target: &mut Vec<String>, values: &[String]) -> usize {
    let mut added = 0;
    for value in values {
        if !target.iter().any(|v| v == value) {
            target.push(value.clone());
            added += 1;
        }
    }
    added
}

fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.contains(v) {
            false
        } else {
            seen.push(v.clone());
            true
        }
    });
}
