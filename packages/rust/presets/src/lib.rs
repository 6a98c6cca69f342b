//! Preset selection: score a fixed preset catalog against a classified brief.
//!
//! [`score_preset`] is an additive/penalty heuristic. [`select_preset`] takes
//! the top scorer and maps its score to a confidence tier; below the medium
//! tier the ranking is discarded in favour of a fixed fallback preset.
//! Theme selection lives in [`theme`].

pub mod theme;

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use appforge_shared::{
    AppForgeError, ClassifierOutput, DeliveryMode, Platform, ProductType, Result,
};

pub use theme::{ThemePack, choose_theme_pack};

/// Preset returned when no catalog entry scores at least [`MEDIUM_CONFIDENCE`].
pub const FALLBACK_PRESET_ID: &str = "generic-saas-starter";

/// Theme paired with [`FALLBACK_PRESET_ID`].
pub const FALLBACK_THEME: ThemePack = ThemePack::ModernSaas;

/// Score at or above which a match is high confidence.
pub const HIGH_CONFIDENCE: i32 = 75;

/// Score at or above which a match is medium confidence.
pub const MEDIUM_CONFIDENCE: i32 = 60;

// Scoring weights.
const PRODUCT_TYPE_EXACT: i32 = 40;
const PRODUCT_TYPE_RELATED: i32 = 15;
const DELIVERY_MATCH: i32 = 20;
const PLATFORM_OVERLAP: i32 = 5;
const RTL_MATCH: i32 = 5;
const TAG_MATCH: i32 = 2;
const TAG_MATCH_CAP: i32 = 15;
const PERSONA_FIT: i32 = 5;
const MISSING_PLATFORM: i32 = 10;
const DELIVERY_CONFLICT: i32 = 20;
const WEAK_MISMATCH_THRESHOLD: i32 = 20;
const WEAK_MISMATCH_PENALTY: i32 = 25;

static EMBEDDED_PRESETS: &str = include_str!("../data/presets.json");

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named template mapping product type, delivery, and platforms to a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub preset_id: String,
    pub product_type: ProductType,
    pub delivery: Vec<DeliveryMode>,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub rtl: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub default_theme: ThemePack,
}

/// Confidence tier of a preset match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Outcome of preset selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetMatch {
    pub preset_id: String,
    pub score: i32,
    pub confidence: Confidence,
    pub default_theme: ThemePack,
    /// Medium-confidence matches rest on assumptions the caller should confirm.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub assumptions: bool,
    /// The catalog was discarded and the fixed fallback preset returned.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

// ---------------------------------------------------------------------------
// Catalog loading
// ---------------------------------------------------------------------------

/// The preset catalog compiled into the binary.
pub fn builtin_presets() -> &'static [Preset] {
    static PRESETS: LazyLock<Vec<Preset>> = LazyLock::new(|| {
        serde_json::from_str(EMBEDDED_PRESETS).expect("embedded presets are valid JSON")
    });
    &PRESETS
}

/// Load and validate a preset catalog from a JSON file.
pub fn load_presets_from(path: &Path) -> Result<Vec<Preset>> {
    let content = std::fs::read_to_string(path).map_err(|e| AppForgeError::io(path, e))?;
    let presets: Vec<Preset> = serde_json::from_str(&content)
        .map_err(|e| AppForgeError::parse(format!("failed to parse {}: {e}", path.display())))?;
    validate_presets(&presets)?;
    info!(path = %path.display(), count = presets.len(), "loaded preset catalog");
    Ok(presets)
}

fn validate_presets(presets: &[Preset]) -> Result<()> {
    for (i, preset) in presets.iter().enumerate() {
        if preset.preset_id.is_empty() {
            return Err(AppForgeError::validation(format!("preset #{i} has an empty presetId")));
        }
        if preset.delivery.is_empty() {
            return Err(AppForgeError::validation(format!(
                "preset `{}` declares no delivery modes",
                preset.preset_id
            )));
        }
        if presets[..i].iter().any(|p| p.preset_id == preset.preset_id) {
            return Err(AppForgeError::validation(format!(
                "duplicate presetId `{}`",
                preset.preset_id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Product types that earn partial credit against each other.
fn related_types(product_type: ProductType) -> &'static [ProductType] {
    use ProductType::*;
    match product_type {
        Crm => &[Helpdesk, Ecommerce],
        Erp => &[Inventory, Hrm, Analytics],
        Hrm => &[Erp],
        Inventory => &[Erp, Ecommerce],
        Ecommerce => &[Marketplace, Inventory],
        Marketplace => &[Ecommerce],
        Lms => &[Community, Cms],
        Helpdesk => &[Crm],
        ProjectManagement => &[Erp],
        Analytics => &[Fintech, Erp],
        Fintech => &[Analytics],
        Healthcare => &[Booking],
        Booking => &[Healthcare, Ecommerce],
        Community => &[Cms, Lms],
        Cms => &[Community, Ecommerce],
        Generic => &[],
    }
}

/// Number of preset tags that overlap a brief keyword (substring either way).
fn tag_matches(keywords: &[String], tags: &[String]) -> i32 {
    tags.iter()
        .filter(|tag| {
            keywords
                .iter()
                .any(|k| k.contains(tag.as_str()) || tag.contains(k.as_str()))
        })
        .count() as i32
}

/// Additive score of a preset against a classified brief.
pub fn score_preset(output: &ClassifierOutput, preset: &Preset) -> i32 {
    let mut score = 0;

    if output.product_type == preset.product_type {
        score += PRODUCT_TYPE_EXACT;
    } else if related_types(output.product_type).contains(&preset.product_type) {
        score += PRODUCT_TYPE_RELATED;
    }

    if preset.delivery.contains(&output.delivery_mode) {
        score += DELIVERY_MATCH;
    }

    let overlap = output
        .platforms
        .iter()
        .filter(|p| preset.platforms.contains(p))
        .count() as i32;
    score += PLATFORM_OVERLAP * overlap;

    if output.rtl == preset.rtl {
        score += RTL_MATCH;
    }

    score += (TAG_MATCH * tag_matches(&output.keywords, &preset.tags)).min(TAG_MATCH_CAP);

    // Flat persona credit; not yet conditioned on the classified persona.
    score += PERSONA_FIT;

    let missing = output.platforms.len() as i32 - overlap;
    score -= MISSING_PLATFORM * missing;

    if !preset.delivery.contains(&output.delivery_mode)
        && preset.delivery.contains(&output.delivery_mode.opposite())
    {
        score -= DELIVERY_CONFLICT;
    }

    if score < WEAK_MISMATCH_THRESHOLD && output.product_type != preset.product_type {
        score -= WEAK_MISMATCH_PENALTY;
    }

    score
}

/// All presets with their scores, best first. Equal scores keep catalog order.
pub fn rank_presets<'a>(output: &ClassifierOutput, presets: &'a [Preset]) -> Vec<(&'a Preset, i32)> {
    let mut ranked: Vec<(&Preset, i32)> =
        presets.iter().map(|p| (p, score_preset(output, p))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Choose the best preset, or the fixed fallback when nothing is convincing.
#[instrument(skip_all, fields(product_type = %output.product_type, presets = presets.len()))]
pub fn select_preset(output: &ClassifierOutput, presets: &[Preset]) -> PresetMatch {
    let ranked = rank_presets(output, presets);

    for (preset, score) in ranked.iter().take(3) {
        debug!(preset = %preset.preset_id, score, "preset candidate");
    }

    let selected = match ranked.first() {
        Some((preset, score)) if *score >= HIGH_CONFIDENCE => PresetMatch {
            preset_id: preset.preset_id.clone(),
            score: *score,
            confidence: Confidence::High,
            default_theme: preset.default_theme,
            assumptions: false,
            fallback: false,
        },
        Some((preset, score)) if *score >= MEDIUM_CONFIDENCE => PresetMatch {
            preset_id: preset.preset_id.clone(),
            score: *score,
            confidence: Confidence::Medium,
            default_theme: preset.default_theme,
            assumptions: true,
            fallback: false,
        },
        _ => fallback_match(),
    };

    info!(
        preset = %selected.preset_id,
        score = selected.score,
        confidence = ?selected.confidence,
        fallback = selected.fallback,
        "preset selected"
    );

    selected
}

fn fallback_match() -> PresetMatch {
    PresetMatch {
        preset_id: FALLBACK_PRESET_ID.to_string(),
        score: 0,
        confidence: Confidence::Low,
        default_theme: FALLBACK_THEME,
        assumptions: false,
        fallback: true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_shared::{Constraints, Persona, Vertical};

    fn output(
        product_type: ProductType,
        delivery_mode: DeliveryMode,
        platforms: Vec<Platform>,
        keywords: &[&str],
    ) -> ClassifierOutput {
        ClassifierOutput {
            product_type,
            delivery_mode,
            deployment: delivery_mode.deployment(),
            platforms,
            rtl: false,
            persona: Persona::General,
            vertical: Vertical::General,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            must_have: vec![],
            constraints: Constraints::default(),
        }
    }

    fn preset(id: &str, product_type: ProductType, delivery: &[DeliveryMode], tags: &[&str]) -> Preset {
        Preset {
            preset_id: id.into(),
            product_type,
            delivery: delivery.to_vec(),
            platforms: vec![Platform::Web, Platform::Mobile],
            rtl: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            default_theme: ThemePack::Professional,
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let presets = builtin_presets();
        assert!(presets.len() >= 10);
        validate_presets(presets).expect("builtin presets validate");
        assert!(presets.iter().all(|p| p.preset_id != FALLBACK_PRESET_ID));
    }

    #[test]
    fn perfect_match_sums_every_positive_term() {
        let tags = ["crm", "sales", "leads", "deals", "contacts", "pipeline", "b2b", "forecast"];
        let out = output(
            ProductType::Crm,
            DeliveryMode::MultiTenantSaaS,
            vec![Platform::Web, Platform::Mobile],
            &tags,
        );
        let p = preset("crm", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &tags);
        // type + delivery + platforms + rtl + capped tags + persona
        assert_eq!(score_preset(&out, &p), 40 + 20 + 5 * 2 + 5 + 15 + 5);
    }

    #[test]
    fn each_matching_tag_adds_two() {
        let out = output(ProductType::Crm, DeliveryMode::MultiTenantSaaS, vec![Platform::Web], &["crm"]);
        let few = preset("a", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &["crm"]);
        let none = preset("b", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]);
        assert_eq!(score_preset(&out, &few) - score_preset(&out, &none), 2);
    }

    #[test]
    fn tag_overlap_matches_substrings_both_ways() {
        let keywords = vec!["sales team".to_string(), "crm".to_string()];
        let tags = vec!["sales".to_string(), "crm suite".to_string(), "erp".to_string()];
        assert_eq!(tag_matches(&keywords, &tags), 2);
    }

    #[test]
    fn related_type_and_conflict_penalties() {
        let out = output(ProductType::Helpdesk, DeliveryMode::OnPremise, vec![Platform::Web], &[]);
        let p = preset("crm", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]);
        // related +15, platform +5, rtl +5, persona +5, conflict -20 = 10,
        // then the weak-mismatch penalty applies: 10 - 25.
        assert_eq!(score_preset(&out, &p), -15);
    }

    #[test]
    fn weak_penalty_skipped_for_same_type() {
        let out = output(
            ProductType::Crm,
            DeliveryMode::OnPremise,
            vec![Platform::Web, Platform::Mobile, Platform::Desktop],
            &[],
        );
        let mut p = preset("crm", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]);
        p.platforms = vec![Platform::Desktop];
        // 40 + 5 + 5 + 5 - 20 (missing) - 20 (conflict) = 15, same type: no extra penalty.
        assert_eq!(score_preset(&out, &p), 15);
    }

    #[test]
    fn missing_platforms_penalized() {
        let out = output(
            ProductType::Crm,
            DeliveryMode::MultiTenantSaaS,
            vec![Platform::Web, Platform::Mobile, Platform::Desktop],
            &[],
        );
        let p = preset("crm", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]);
        // 40 + 20 + 10 + 5 + 5 - 10
        assert_eq!(score_preset(&out, &p), 70);
    }

    #[test]
    fn medium_confidence_sets_assumptions() {
        let out = output(
            ProductType::Crm,
            DeliveryMode::MultiTenantSaaS,
            vec![Platform::Web, Platform::Mobile, Platform::Desktop],
            &[],
        );
        let presets = vec![preset("crm", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[])];
        let m = select_preset(&out, &presets);
        assert_eq!(m.score, 70);
        assert_eq!(m.confidence, Confidence::Medium);
        assert!(m.assumptions);
        assert!(!m.fallback);
    }

    #[test]
    fn low_scores_return_fixed_fallback() {
        let mut out = output(
            ProductType::Generic,
            DeliveryMode::OnPremise,
            vec![Platform::Web, Platform::Mobile, Platform::Desktop],
            &[],
        );
        out.rtl = true;
        let ranked = rank_presets(&out, builtin_presets());
        assert!(ranked[0].1 < MEDIUM_CONFIDENCE);

        let m = select_preset(&out, builtin_presets());
        assert_eq!(m.preset_id, FALLBACK_PRESET_ID);
        assert_eq!(m.score, 0);
        assert_eq!(m.confidence, Confidence::Low);
        assert!(m.fallback);
        assert_eq!(m.default_theme, FALLBACK_THEME);
    }

    #[test]
    fn empty_catalog_falls_back() {
        let out = output(ProductType::Crm, DeliveryMode::MultiTenantSaaS, vec![Platform::Web], &[]);
        assert!(select_preset(&out, &[]).fallback);
    }

    #[test]
    fn crm_brief_selects_sales_preset() {
        let out = appforge_classifier::classify_brief(
            "Build a CRM for B2B sales teams, multi-tenant SaaS, need mobile app",
        );
        let m = select_preset(&out, builtin_presets());
        assert_eq!(m.preset_id, "crm-saas-sales");
        assert_eq!(m.confidence, Confidence::High);
        assert_eq!(m.score, 88);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let out = output(ProductType::Crm, DeliveryMode::MultiTenantSaaS, vec![Platform::Web], &[]);
        let presets = vec![
            preset("first", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]),
            preset("second", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]),
        ];
        let ranked = rank_presets(&out, &presets);
        assert_eq!(ranked[0].0.preset_id, "first");
    }

    #[test]
    fn load_presets_rejects_duplicates() {
        let presets = vec![
            preset("dup", ProductType::Crm, &[DeliveryMode::MultiTenantSaaS], &[]),
            preset("dup", ProductType::Erp, &[DeliveryMode::OnPremise], &[]),
        ];
        let path = std::env::temp_dir().join(format!("appforge_presets_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&presets).unwrap()).unwrap();
        let result = load_presets_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.unwrap_err().to_string().contains("duplicate presetId"));
    }
}
