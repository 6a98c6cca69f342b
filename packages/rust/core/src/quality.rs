//! Quality gate: scores a build plan / scaffold plan pair from 0 to 100.
//!
//! The score starts at 100. Six independent checks each report issues and a
//! deduction; deductions are summed, subtracted, and the result is clamped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use appforge_shared::{BuildPlan, Platform, QualityConfig, ScaffoldPlan};

/// Table component that does not fit narrow screens.
const DESKTOP_TABLE_COMPONENT: &str = "DataTable";

/// Mobile replacement for [`DESKTOP_TABLE_COMPONENT`].
const MOBILE_TABLE_COMPONENT: &str = "MobileCardList";

/// Scaffold path fragments that suggest committed credentials.
const SENSITIVE_PATH_WORDS: &[&str] = &["secret", "key", "password", "token"];

const COMPONENT_LIMIT: usize = 100;
const PAGE_LIMIT: usize = 50;

/// Appended to every failing result.
const FAILURE_SUGGESTIONS: [&str; 3] = [
    "Resolve error-severity issues before generating code",
    "Enrich the product spec with platforms, modules, and UI components",
    "Re-run the quality gate after refining the build plan",
];

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One finding of a quality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    /// Check that raised the issue, e.g. `build-plan`.
    pub category: String,
    pub message: String,
    /// Description of an automatic fix, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl QualityIssue {
    fn error(category: &str, message: &str) -> Self {
        Self {
            severity: Severity::Error,
            category: category.to_string(),
            message: message.to_string(),
            fix: None,
        }
    }

    fn warning(category: &str, message: &str) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, message)
        }
    }

    fn with_fix(mut self, fix: &str) -> Self {
        self.fix = Some(fix.to_string());
        self
    }
}

/// Outcome of the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub score: i32,
    pub passed: bool,
    /// Error-severity issues.
    pub issues: Vec<QualityIssue>,
    pub warnings: Vec<QualityIssue>,
    pub suggestions: Vec<String>,
}

impl QualityResult {
    pub fn error_count(&self) -> usize {
        self.issues.len()
    }
}

#[derive(Debug, Default)]
struct CheckOutcome {
    issues: Vec<QualityIssue>,
    suggestions: Vec<String>,
    deduction: i32,
}

impl CheckOutcome {
    fn flag(&mut self, issue: QualityIssue, deduction: i32) {
        self.issues.push(issue);
        self.deduction += deduction;
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn check_build_plan(plan: &BuildPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    if plan.platforms.is_empty() {
        out.flag(
            QualityIssue::error("build-plan", "No target platforms specified")
                .with_fix("Default platforms to web"),
            20,
        );
    }
    if plan.page_count() == 0 {
        out.flag(QualityIssue::warning("build-plan", "Build plan has no pages"), 10);
    }
    if plan.component_count() == 0 {
        out.flag(QualityIssue::warning("build-plan", "Build plan has no components"), 10);
    }
    if plan.routes.is_empty() {
        out.flag(QualityIssue::warning("build-plan", "Build plan has no routes"), 5);
    }
    out
}

fn check_scaffold(scaffold: &ScaffoldPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    if scaffold.files.is_empty() {
        out.flag(QualityIssue::error("scaffold", "Scaffold plan has no files"), 30);
    }
    if scaffold.dependencies.is_empty() {
        out.flag(QualityIssue::warning("scaffold", "Scaffold plan has no dependencies"), 5);
    }
    out
}

fn check_platform_compatibility(plan: &BuildPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    if plan.platforms.contains(&Platform::Mobile) && plan.has_component(DESKTOP_TABLE_COMPONENT) {
        out.flag(
            QualityIssue::warning(
                "platform",
                &format!("{DESKTOP_TABLE_COMPONENT} is not suited to mobile layouts"),
            ),
            5,
        );
        out.suggestions.push(format!(
            "Use {MOBILE_TABLE_COMPONENT} instead of {DESKTOP_TABLE_COMPONENT} on mobile"
        ));
    }
    out
}

fn check_accessibility(plan: &BuildPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    // Every recognized atom kind is interactive.
    if !plan.atoms.is_empty() {
        out.flag(
            QualityIssue::warning(
                "accessibility",
                "Interactive components need accessible labels and keyboard focus handling",
            ),
            5,
        );
    }
    out
}

fn check_performance(plan: &BuildPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    let components = plan.component_count();
    if components > COMPONENT_LIMIT {
        out.flag(
            QualityIssue::warning(
                "performance",
                &format!("{components} components exceed the limit of {COMPONENT_LIMIT}"),
            ),
            5,
        );
        out.suggestions
            .push("Split components into lazily loaded chunks".to_string());
    }
    let pages = plan.page_count();
    if pages > PAGE_LIMIT {
        out.flag(
            QualityIssue::warning(
                "performance",
                &format!("{pages} pages exceed the limit of {PAGE_LIMIT}"),
            ),
            3,
        );
        out.suggestions
            .push("Split routes into separately loaded sections".to_string());
    }
    out
}

fn check_security(scaffold: &ScaffoldPlan) -> CheckOutcome {
    let mut out = CheckOutcome::default();
    let flagged: Vec<&str> = scaffold
        .files
        .iter()
        .filter(|f| {
            let lower = f.to_lowercase();
            SENSITIVE_PATH_WORDS.iter().any(|w| lower.contains(w))
        })
        .map(String::as_str)
        .collect();

    if !flagged.is_empty() {
        out.flag(
            QualityIssue::warning(
                "security",
                &format!("Scaffold files may contain credentials: {}", flagged.join(", ")),
            ),
            10,
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Score a build plan and scaffold plan against `config`.
#[instrument(skip_all, fields(target = %plan.target, min_score = config.min_score))]
pub fn run_quality_gate(
    plan: &BuildPlan,
    scaffold: &ScaffoldPlan,
    config: &QualityConfig,
) -> QualityResult {
    let mut outcomes = vec![
        check_build_plan(plan),
        check_scaffold(scaffold),
        check_platform_compatibility(plan),
    ];
    if config.check_a11y {
        outcomes.push(check_accessibility(plan));
    }
    if config.check_performance {
        outcomes.push(check_performance(plan));
    }
    if config.check_security {
        outcomes.push(check_security(scaffold));
    }

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();
    let mut deduction = 0;

    for outcome in outcomes {
        deduction += outcome.deduction;
        suggestions.extend(outcome.suggestions);
        for issue in outcome.issues {
            debug!(category = %issue.category, severity = ?issue.severity, message = %issue.message, "quality issue");
            match issue.severity {
                Severity::Error => issues.push(issue),
                Severity::Warning | Severity::Info => warnings.push(issue),
            }
        }
    }

    let score = (100 - deduction).clamp(0, 100);
    let mut passed = score >= config.min_score;
    if config.strict_mode && !issues.is_empty() {
        passed = false;
    }

    if !passed {
        suggestions.extend(FAILURE_SUGGESTIONS.iter().map(|s| s.to_string()));
    }

    info!(score, passed, errors = issues.len(), warnings = warnings.len(), "quality gate finished");

    QualityResult {
        score,
        passed,
        issues,
        warnings,
        suggestions,
    }
}

/// Apply the automatic fixes the gate knows about.
///
/// Only a missing platform list is repaired (set to web). Every other issue is
/// left for the caller.
pub fn refine_build_plan(plan: &BuildPlan, issues: &[QualityIssue]) -> BuildPlan {
    let mut refined = plan.clone();
    for issue in issues {
        let fixable = issue.severity == Severity::Error
            && issue.fix.as_deref().is_some_and(|f| !f.is_empty())
            && issue.category == "build-plan"
            && issue.message.to_lowercase().contains("platforms");

        if fixable && refined.platforms.is_empty() {
            debug!(message = %issue.message, "defaulting platforms to web");
            refined.platforms = vec![Platform::Web];
        }
    }
    refined
}
