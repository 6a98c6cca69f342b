//! Theme pack resolution.
//!
//! An ordered decision list over classifier signals; the first matching
//! branch wins. Falls through to the selected preset's default theme.

use serde::{Deserialize, Serialize};

use appforge_classifier::NormalizedBrief;
use appforge_shared::{ClassifierOutput, DeliveryMode, Persona, ProductType, Vertical};

/// Visual theme packs known to the design-token generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePack {
    GovTrust,
    EnterpriseDense,
    Professional,
    FinanceDark,
    GlassAurora,
    Minimal,
    WarmMarket,
    Brutalist,
    ModernSaas,
}

impl ThemePack {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GovTrust => "gov-trust",
            Self::EnterpriseDense => "enterprise-dense",
            Self::Professional => "professional",
            Self::FinanceDark => "finance-dark",
            Self::GlassAurora => "glass-aurora",
            Self::Minimal => "minimal",
            Self::WarmMarket => "warm-market",
            Self::Brutalist => "brutalist",
            Self::ModernSaas => "modern-saas",
        }
    }
}

impl std::fmt::Display for ThemePack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DATA_HEAVY_TYPES: &[ProductType] = &[
    ProductType::Erp,
    ProductType::Analytics,
    ProductType::Inventory,
    ProductType::Hrm,
];

const COMMERCE_TYPES: &[ProductType] = &[ProductType::Ecommerce, ProductType::Marketplace];

/// Resolve the theme pack for a classified brief.
pub fn choose_theme_pack(
    output: &ClassifierOutput,
    text: &NormalizedBrief,
    preset_default: ThemePack,
) -> ThemePack {
    let has = |needle: &str| text.as_str().contains(needle);
    let has_word = |word: &str| text.as_str().split(' ').any(|w| w == word);

    if output.delivery_mode == DeliveryMode::OnPremise
        || output.vertical == Vertical::Government
        || output.persona == Persona::Government
    {
        return ThemePack::GovTrust;
    }

    if DATA_HEAVY_TYPES.contains(&output.product_type) {
        let power_user = output.persona == Persona::PowerUser || has("power user") || has("dense");
        return if power_user {
            ThemePack::EnterpriseDense
        } else {
            ThemePack::Professional
        };
    }

    if output.product_type == ProductType::Fintech
        || output.vertical == Vertical::Finance
        || has("fintech")
        || has("trading")
        || has("analytics")
    {
        return ThemePack::FinanceDark;
    }

    if has("glass") && has("modern") && has_word("ai") {
        return ThemePack::GlassAurora;
    }

    if output.persona == Persona::Minimal || has("minimal") || has("clean") {
        return ThemePack::Minimal;
    }

    if COMMERCE_TYPES.contains(&output.product_type) {
        let warm = output.persona == Persona::Consumer || has("warm") || has("cozy") || has("friendly");
        return if warm {
            ThemePack::WarmMarket
        } else {
            ThemePack::Minimal
        };
    }

    if has("bold") || has("brutal") {
        return ThemePack::Brutalist;
    }

    preset_default
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_classifier::classify_brief;

    fn theme_for(brief: &str) -> ThemePack {
        let output = classify_brief(brief);
        choose_theme_pack(&output, &NormalizedBrief::new(brief), ThemePack::ModernSaas)
    }

    #[test]
    fn on_premise_wins_over_everything() {
        assert_eq!(theme_for("self-hosted fintech trading desk"), ThemePack::GovTrust);
        assert_eq!(theme_for("portal for a municipal government"), ThemePack::GovTrust);
    }

    #[test]
    fn data_heavy_types_split_on_power_users() {
        assert_eq!(theme_for("ERP for finance teams"), ThemePack::Professional);
        assert_eq!(theme_for("ERP with a dense layout for power users"), ThemePack::EnterpriseDense);
    }

    #[test]
    fn finance_signals_pick_dark_theme() {
        assert_eq!(theme_for("a digital wallet fintech app"), ThemePack::FinanceDark);
        assert_eq!(theme_for("CRM with analytics"), ThemePack::FinanceDark);
    }

    #[test]
    fn glass_requires_all_three_signals() {
        assert_eq!(theme_for("a modern glass look for our AI assistant"), ThemePack::GlassAurora);
        // "ai" only as part of another word does not count.
        assert_eq!(theme_for("a modern glass look for email"), ThemePack::ModernSaas);
    }

    #[test]
    fn commerce_warmth() {
        assert_eq!(theme_for("online store with checkout for families, warm and friendly"), ThemePack::WarmMarket);
        assert_eq!(theme_for("online store with shopping cart"), ThemePack::Minimal);
    }

    #[test]
    fn bold_and_default() {
        assert_eq!(theme_for("a bold forum"), ThemePack::Brutalist);
        assert_eq!(theme_for("something unremarkable"), ThemePack::ModernSaas);
    }
}
