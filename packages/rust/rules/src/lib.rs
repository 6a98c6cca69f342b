//! Rules matrix engine: enhance a [`ProductSpec`] with implied features,
//! modules, constraints, and UI choices.
//!
//! The matrix is an ordered list of `when → apply` rules evaluated in a
//! single pass. Every condition is checked against the caller's original
//! spec; only the effects accumulate on the working copy, so a rule never
//! observes additions made by an earlier rule in the same pass.

pub mod matcher;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use appforge_shared::{AppForgeError, ProductSpec, Result, append_unique};

pub use matcher::{Condition, matches_rule, resolve_path};

static EMBEDDED_RULES: &str = include_str!("../data/rules.json");

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Effects of a matched rule. Every list operation is append-if-absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleActions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features_add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules_add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints_add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ui_components_add: Vec<String>,
    /// Shallow merge into `uiOverrides`; later rules win on key conflicts.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ui_overrides_merge: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ui_patterns_add: Vec<String>,
}

impl RuleActions {
    fn is_empty(&self) -> bool {
        self.features_add.is_empty()
            && self.modules_add.is_empty()
            && self.constraints_add.is_empty()
            && self.ui_components_add.is_empty()
            && self.ui_overrides_merge.is_empty()
            && self.ui_patterns_add.is_empty()
    }
}

/// One entry of the rules matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Dotted spec path → condition. All must hold.
    pub when: BTreeMap<String, Condition>,
    pub apply: RuleActions,
}

/// Result of one enhancement pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancement {
    pub spec: ProductSpec,
    /// Ids of the rules that matched, in matrix order.
    pub matched: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// The rules matrix compiled into the binary.
pub fn builtin_rules() -> &'static [Rule] {
    static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
        serde_json::from_str(EMBEDDED_RULES).expect("embedded rules are valid JSON")
    });
    &RULES
}

/// Load and validate a rules matrix from a JSON file.
pub fn load_rules_from(path: &Path) -> Result<Vec<Rule>> {
    let content = std::fs::read_to_string(path).map_err(|e| AppForgeError::io(path, e))?;
    let rules: Vec<Rule> = serde_json::from_str(&content)
        .map_err(|e| AppForgeError::Rules(format!("failed to parse {}: {e}", path.display())))?;
    validate_rules(&rules)?;
    info!(path = %path.display(), count = rules.len(), "loaded rules matrix");
    Ok(rules)
}

/// Every rule needs an id, at least one condition, and at least one action.
pub fn validate_rules(rules: &[Rule]) -> Result<()> {
    for (i, rule) in rules.iter().enumerate() {
        if rule.id.trim().is_empty() {
            return Err(AppForgeError::validation(format!("rule #{i} has an empty id")));
        }
        if rule.when.is_empty() {
            return Err(AppForgeError::validation(format!(
                "rule `{}` has no conditions",
                rule.id
            )));
        }
        if rule.apply.is_empty() {
            return Err(AppForgeError::validation(format!(
                "rule `{}` has no actions",
                rule.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Enhancement
// ---------------------------------------------------------------------------

/// Apply a rule's effects to a spec. Idempotent.
pub fn apply_rule(spec: &mut ProductSpec, actions: &RuleActions) {
    append_unique(&mut spec.features, &actions.features_add);
    append_unique(&mut spec.modules, &actions.modules_add);
    append_unique(&mut spec.constraints, &actions.constraints_add);
    append_unique(&mut spec.ui_components, &actions.ui_components_add);
    append_unique(&mut spec.ui_patterns, &actions.ui_patterns_add);
    for (key, value) in &actions.ui_overrides_merge {
        spec.ui_overrides.insert(key.clone(), value.clone());
    }
}

/// Run one pass of the rules matrix over an independent copy of `spec`.
#[instrument(skip_all, fields(app = %spec.app.name, rules = rules.len()))]
pub fn enhance_spec(spec: &ProductSpec, rules: &[Rule]) -> Result<Enhancement> {
    let original = serde_json::to_value(spec)
        .map_err(|e| AppForgeError::parse(format!("cannot view spec as JSON: {e}")))?;

    let mut enhanced = spec.normalized();
    let mut matched = Vec::new();

    for rule in rules {
        if matches_rule(&original, &rule.when) {
            debug!(rule = %rule.id, "rule matched");
            apply_rule(&mut enhanced, &rule.apply);
            matched.push(rule.id.clone());
        }
    }

    info!(
        matched = matched.len(),
        features = enhanced.features.len(),
        modules = enhanced.modules.len(),
        "spec enhanced"
    );

    Ok(Enhancement {
        spec: enhanced,
        matched,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_shared::{DeliveryMode, Platform};
    use serde_json::json;

    fn rule(id: &str, when: serde_json::Value, apply: serde_json::Value) -> Rule {
        serde_json::from_value(json!({"id": id, "when": when, "apply": apply})).expect("valid rule")
    }

    fn fixture_spec() -> ProductSpec {
        let json = std::fs::read_to_string("../../../fixtures/json/product_spec.fixture.json")
            .expect("read fixture");
        ProductSpec::from_json(&json).expect("parse fixture")
    }

    #[test]
    fn builtin_matrix_is_valid() {
        let rules = builtin_rules();
        assert!(!rules.is_empty());
        validate_rules(rules).expect("builtin rules validate");
    }

    #[test]
    fn conditions_see_only_the_original_spec() {
        let rules = vec![
            rule("adds-payments", json!({"app.name": "Shop"}), json!({"featuresAdd": ["payments"]})),
            rule(
                "needs-payments",
                json!({"features": {"$contains": "payments"}}),
                json!({"modulesAdd": ["billing"]}),
            ),
        ];
        let mut spec = ProductSpec::default();
        spec.app.name = "Shop".into();

        let result = enhance_spec(&spec, &rules).expect("enhance");
        assert_eq!(result.spec.features, vec!["payments"]);
        assert!(result.spec.modules.is_empty());
        assert_eq!(result.matched, vec!["adds-payments"]);
    }

    #[test]
    fn apply_rule_is_idempotent() {
        let actions: RuleActions = serde_json::from_value(json!({
            "featuresAdd": ["a", "b"],
            "uiPatternsAdd": ["p"],
            "uiOverridesMerge": {"k": 1}
        }))
        .unwrap();
        let mut once = ProductSpec::default();
        apply_rule(&mut once, &actions);
        let mut twice = once.clone();
        apply_rule(&mut twice, &actions);
        assert_eq!(once, twice);
        assert_eq!(twice.features, vec!["a", "b"]);
    }

    #[test]
    fn effects_accumulate_in_first_seen_order() {
        let rules = vec![
            rule("r1", json!({"deliveryMode": "multiTenantSaaS"}), json!({"modulesAdd": ["x", "y"]})),
            rule("r2", json!({"deliveryMode": "multiTenantSaaS"}), json!({"modulesAdd": ["y", "z"]})),
        ];
        let mut spec = ProductSpec::default();
        spec.modules = vec!["z".into()];
        let result = enhance_spec(&spec, &rules).unwrap();
        assert_eq!(result.spec.modules, vec!["z", "x", "y"]);
    }

    #[test]
    fn overrides_merge_shallow_last_wins() {
        let rules = vec![
            rule("a", json!({"deliveryMode": "multiTenantSaaS"}), json!({"uiOverridesMerge": {"theme": {"radius": 4, "shadow": true}, "density": "compact"}})),
            rule("b", json!({"deliveryMode": "multiTenantSaaS"}), json!({"uiOverridesMerge": {"theme": {"radius": 8}}})),
        ];
        let result = enhance_spec(&ProductSpec::default(), &rules).unwrap();
        assert_eq!(result.spec.ui_overrides["theme"], json!({"radius": 8}));
        assert_eq!(result.spec.ui_overrides["density"], json!("compact"));
    }

    #[test]
    fn input_spec_is_untouched() {
        let spec = fixture_spec();
        let before = spec.clone();
        let _ = enhance_spec(&spec, builtin_rules()).unwrap();
        assert_eq!(spec, before);
    }

    #[test]
    fn fixture_spec_with_builtin_rules() {
        let result = enhance_spec(&fixture_spec(), builtin_rules()).unwrap();
        for id in [
            "multi-tenant-isolation",
            "sso-identity",
            "rbac-permissions",
            "payments-billing",
            "mobile-first",
            "crm-pipeline",
            "reporting-dashboards",
            "crm-mobile-density",
        ] {
            assert!(result.matched.iter().any(|m| m == id), "{id} should match");
        }
        assert!(!result.matched.iter().any(|m| m == "on-premise-hardening"));

        let spec = result.spec;
        // "billing" comes from two rules but appears once.
        assert_eq!(spec.modules.iter().filter(|m| *m == "billing").count(), 1);
        assert!(spec.ui_components.contains(&"MobileCardList".to_string()));
        assert_eq!(spec.ui_overrides["density"], json!("comfortable"));
    }

    #[test]
    fn on_premise_rule_adds_cdn_constraint() {
        let mut spec = ProductSpec::default();
        spec.delivery_mode = DeliveryMode::OnPremise;
        spec.platforms = vec![Platform::Web, Platform::Desktop];
        let result = enhance_spec(&spec, builtin_rules()).unwrap();
        assert!(result.spec.constraints.contains(&"noExternalCDN".to_string()));
        assert!(result.spec.features.contains(&"auto-update".to_string()));
        assert!(result.matched.iter().all(|m| m != "multi-tenant-isolation"));
    }

    #[test]
    fn validation_rejects_empty_actions() {
        let bad = vec![rule("noop", json!({"deliveryMode": "onPremise"}), json!({}))];
        let err = validate_rules(&bad).unwrap_err();
        assert!(err.to_string().contains("no actions"));
    }

    #[test]
    fn load_rules_from_disk() {
        let path = std::env::temp_dir().join(format!("appforge_rules_{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"id": "x", "when": {"security.mfa": true}, "apply": {"featuresAdd": ["otp"]}}]"#)
            .unwrap();
        let rules = load_rules_from(&path);
        let _ = std::fs::remove_file(&path);
        let rules = rules.expect("load rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].when["security.mfa"], Condition::Equals(json!(true)));
    }
}
