//! Brief classifier: free-text product brief → [`ClassifierOutput`].
//!
//! Classification is a fixed-table heuristic. The brief is normalized, then
//! each signal is derived independently:
//! - product type, persona, vertical: weighted keyword argmax with a threshold
//! - delivery mode: on-premise keywords short-circuit before SaaS keywords
//! - platforms, RTL, constraints: keyword presence checks
//!
//! Every function is pure; identical input text always yields identical output.

pub mod keywords;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use appforge_shared::{
    ClassifierOutput, Constraints, DeliveryMode, Persona, Platform, ProductType, Vertical,
};

use keywords::{
    DESKTOP_KEYWORDS, HEADLESS_KEYWORDS, KeywordWeight, MAX_KEYWORDS, MOBILE_KEYWORDS,
    OFFLINE_KEYWORDS, ON_PREMISE_KEYWORDS, PERSONA_KEYWORDS, PERSONA_THRESHOLD,
    PRODUCT_TYPE_KEYWORDS, PRODUCT_TYPE_THRESHOLD, RTL_KEYWORDS, SAAS_KEYWORDS,
    VERTICAL_KEYWORDS, VERTICAL_THRESHOLD,
};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Brief text after normalization: lowercase, punctuation replaced by spaces,
/// whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBrief(String);

impl NormalizedBrief {
    pub fn new(raw: &str) -> Self {
        static NON_WORD_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
        static WHITESPACE_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

        let lower = raw.to_lowercase();
        let stripped = NON_WORD_RE.replace_all(&lower, " ");
        let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
        Self(collapsed.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.0.contains(n))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Classify a raw product brief.
#[instrument(skip_all, fields(len = brief.len()))]
pub fn classify_brief(brief: &str) -> ClassifierOutput {
    let text = NormalizedBrief::new(brief);

    let product_type = classify_product_type(&text);
    let delivery_mode = classify_delivery_mode(&text);
    let output = ClassifierOutput {
        product_type,
        delivery_mode,
        deployment: delivery_mode.deployment(),
        platforms: infer_platforms(&text),
        rtl: infer_rtl(&text),
        persona: classify_persona(&text),
        vertical: classify_vertical(&text),
        keywords: extract_keywords(&text),
        must_have: must_have_defaults(product_type),
        constraints: infer_constraints(&text, delivery_mode),
    };

    debug!(
        product_type = %output.product_type,
        delivery = output.delivery_mode.as_str(),
        persona = output.persona.as_str(),
        vertical = output.vertical.as_str(),
        keywords = output.keywords.len(),
        "brief classified"
    );

    output
}

// ---------------------------------------------------------------------------
// Weighted argmax classifiers
// ---------------------------------------------------------------------------

/// Per-type score table in declaration order.
pub fn score_product_types(text: &NormalizedBrief) -> Vec<(ProductType, u32)> {
    score_table(PRODUCT_TYPE_KEYWORDS, text)
}

/// Highest-scoring product type, or [`ProductType::Generic`] below the threshold.
pub fn classify_product_type(text: &NormalizedBrief) -> ProductType {
    weighted_argmax(
        PRODUCT_TYPE_KEYWORDS,
        text,
        PRODUCT_TYPE_THRESHOLD,
        ProductType::Generic,
    )
}

pub fn classify_persona(text: &NormalizedBrief) -> Persona {
    weighted_argmax(PERSONA_KEYWORDS, text, PERSONA_THRESHOLD, Persona::General)
}

pub fn classify_vertical(text: &NormalizedBrief) -> Vertical {
    weighted_argmax(VERTICAL_KEYWORDS, text, VERTICAL_THRESHOLD, Vertical::General)
}

fn score_table<T: Copy>(table: &[(T, &[KeywordWeight])], text: &NormalizedBrief) -> Vec<(T, u32)> {
    table
        .iter()
        .map(|(value, keywords)| {
            let score = keywords
                .iter()
                .filter(|k| text.contains(k.keyword))
                .map(|k| k.weight)
                .sum();
            (*value, score)
        })
        .collect()
}

/// Pick the highest score; ties keep the first-declared entry.
fn weighted_argmax<T: Copy>(
    table: &[(T, &[KeywordWeight])],
    text: &NormalizedBrief,
    threshold: u32,
    fallback: T,
) -> T {
    let mut best: Option<(T, u32)> = None;
    for (value, score) in score_table(table, text) {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((value, score)),
        }
    }

    match best {
        Some((value, score)) if score >= threshold => value,
        _ => fallback,
    }
}

// ---------------------------------------------------------------------------
// Delivery mode
// ---------------------------------------------------------------------------

/// On-premise signals win outright, even when SaaS signals are also present.
pub fn classify_delivery_mode(text: &NormalizedBrief) -> DeliveryMode {
    if text.contains_any(ON_PREMISE_KEYWORDS) {
        return DeliveryMode::OnPremise;
    }
    if text.contains_any(SAAS_KEYWORDS) {
        return DeliveryMode::MultiTenantSaaS;
    }
    DeliveryMode::MultiTenantSaaS
}

// ---------------------------------------------------------------------------
// Platforms, RTL, keywords
// ---------------------------------------------------------------------------

/// `web` first, then `mobile`, then `desktop`, each only when signalled.
pub fn infer_platforms(text: &NormalizedBrief) -> Vec<Platform> {
    let mut platforms = vec![Platform::Web];
    if text.contains_any(MOBILE_KEYWORDS) {
        platforms.push(Platform::Mobile);
    }
    if text.contains_any(DESKTOP_KEYWORDS) {
        platforms.push(Platform::Desktop);
    }
    platforms
}

pub fn infer_rtl(text: &NormalizedBrief) -> bool {
    text.contains_any(RTL_KEYWORDS)
}

/// Every product-type keyword present in the brief, across all types,
/// deduplicated in first-seen table order and capped at [`MAX_KEYWORDS`].
pub fn extract_keywords(text: &NormalizedBrief) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (_, keywords) in PRODUCT_TYPE_KEYWORDS {
        for k in keywords.iter() {
            if text.contains(k.keyword) && !found.iter().any(|f| f == k.keyword) {
                found.push(k.keyword.to_string());
            }
        }
    }
    found.truncate(MAX_KEYWORDS);
    found
}

// ---------------------------------------------------------------------------
// Constraints and defaults
// ---------------------------------------------------------------------------

pub fn infer_constraints(text: &NormalizedBrief, delivery_mode: DeliveryMode) -> Constraints {
    let mut offline_first = false;
    for keyword in OFFLINE_KEYWORDS {
        if text.contains(keyword) {
            offline_first = true;
            break;
        }
    }

    let mut headless = false;
    for keyword in HEADLESS_KEYWORDS {
        if text.contains(keyword) {
            headless = true;
            break;
        }
    }

    Constraints {
        no_external_cdn: delivery_mode == DeliveryMode::OnPremise,
        offline_first,
        sso: text.contains("sso") || text.contains("single sign on") || text.contains("saml"),
        headless,
        strict_audit: text.contains("audit") || text.contains("compliance"),
    }
}

pub fn must_have_defaults(product_type: ProductType) -> Vec<String> {
    keywords::must_have_for(product_type)
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(s: &str) -> NormalizedBrief {
        NormalizedBrief::new(s)
    }

    #[test]
    fn normalize_strips_punctuation_and_collapses() {
        let text = brief("  Multi-Tenant   SaaS,\tfor CRM!! ");
        assert_eq!(text.as_str(), "multi tenant saas for crm");
    }

    #[test]
    fn normalize_keeps_non_latin_letters() {
        let text = brief("واجهة العربية!");
        assert!(text.as_str().contains("العربية"));
    }

    #[test]
    fn crm_brief_end_to_end() {
        let out = classify_brief("Build a CRM for B2B sales teams, multi-tenant SaaS, need mobile app");
        assert_eq!(out.product_type, ProductType::Crm);
        assert_eq!(out.delivery_mode, DeliveryMode::MultiTenantSaaS);
        assert_eq!(out.platforms, vec![Platform::Web, Platform::Mobile]);
        assert!(!out.rtl);
        assert_eq!(out.must_have[0], "contacts");
        assert!(out.keywords.contains(&"crm".to_string()));
    }

    #[test]
    fn low_score_falls_back_to_generic() {
        // "stock" alone scores 3, well under the threshold.
        assert_eq!(classify_product_type(&brief("we track stock")), ProductType::Generic);
        assert_eq!(classify_product_type(&brief("")), ProductType::Generic);
    }

    #[test]
    fn ties_resolve_to_first_declared_type() {
        // "crm" and "erp" both weigh 12; CRM is declared first.
        assert_eq!(classify_product_type(&brief("erp and crm")), ProductType::Crm);
        assert_eq!(classify_product_type(&brief("crm and erp")), ProductType::Crm);
    }

    #[test]
    fn product_type_is_deterministic() {
        let text = brief("An online store with shopping cart and a seller marketplace");
        let first = classify_product_type(&text);
        for _ in 0..10 {
            assert_eq!(classify_product_type(&text), first);
        }
    }

    #[test]
    fn on_premise_short_circuits_saas() {
        let text = brief("A multi-tenant SaaS that can also be deployed on-premise");
        assert_eq!(classify_delivery_mode(&text), DeliveryMode::OnPremise);
    }

    #[test]
    fn delivery_defaults_to_saas() {
        assert_eq!(classify_delivery_mode(&brief("a todo list")), DeliveryMode::MultiTenantSaaS);
    }

    #[test]
    fn platforms_keep_insertion_order() {
        let text = brief("desktop client plus an Android companion");
        assert_eq!(
            infer_platforms(&text),
            vec![Platform::Web, Platform::Mobile, Platform::Desktop]
        );
        assert_eq!(infer_platforms(&brief("website")), vec![Platform::Web]);
    }

    #[test]
    fn rtl_detects_latin_and_native_script() {
        assert!(infer_rtl(&brief("Support Arabic and English")));
        assert!(infer_rtl(&brief("واجهة باللغة العربية")));
        assert!(infer_rtl(&brief("ממשק בעברית")));
        assert!(!infer_rtl(&brief("English only")));
    }

    #[test]
    fn persona_and_vertical_thresholds() {
        assert_eq!(classify_persona(&brief("clean")), Persona::General);
        assert_eq!(classify_persona(&brief("clean and simple")), Persona::Minimal);
        assert_eq!(classify_vertical(&brief("for a hospital")), Vertical::Healthcare);
        assert_eq!(classify_vertical(&brief("plant")), Vertical::General);
    }

    #[test]
    fn keywords_span_all_product_tables() {
        let text = brief("crm with payroll and kanban boards");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords, vec!["crm", "payroll", "kanban"]);
    }

    #[test]
    fn keywords_are_bounded_substrings() {
        let mut long = String::new();
        for (_, table) in PRODUCT_TYPE_KEYWORDS {
            for k in table.iter() {
                long.push_str(k.keyword);
                long.push(' ');
            }
        }
        let text = brief(&long);
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        for k in &keywords {
            assert!(text.as_str().contains(k.as_str()), "{k} not in text");
        }
        let unique: std::collections::HashSet<_> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());
    }

    #[test]
    fn constraints_from_text_and_delivery() {
        let text = brief("Offline-first field app with SSO and a full audit trail, api first");
        let c = infer_constraints(&text, DeliveryMode::MultiTenantSaaS);
        assert!(c.offline_first);
        assert!(c.sso);
        assert!(c.strict_audit);
        assert!(c.headless);
        assert!(!c.no_external_cdn);

        let c = infer_constraints(&brief("plain"), DeliveryMode::OnPremise);
        assert!(c.no_external_cdn);
        assert!(!c.sso);
    }

    #[test]
    fn output_serializes_camel_case() {
        let out = classify_brief("self-hosted ERP for a factory");
        assert_eq!(out.product_type, ProductType::Erp);
        assert_eq!(out.delivery_mode, DeliveryMode::OnPremise);
        let json = serde_json::to_value(&out).expect("serialize");
        assert_eq!(json["deliveryMode"], "onPremise");
        assert_eq!(json["deployment"], "self-hosted");
        assert_eq!(json["constraints"]["noExternalCDN"], true);
    }
}
