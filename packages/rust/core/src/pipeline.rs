//! End-to-end pipeline: brief + spec → classify → preset → enhance → retrieve
//! → compose → routes → scaffold → quality gate (→ refine → re-gate).

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use appforge_catalog::{IndexSource, RetrievalOptions, retrieve_from_catalog};
use appforge_classifier::{NormalizedBrief, classify_brief};
use appforge_presets::{Preset, PresetMatch, ThemePack, choose_theme_pack, select_preset};
use appforge_rules::{Rule, enhance_spec};
use appforge_shared::{
    AppConfig, AppForgeError, BuildPlan, BuildTarget, ClassifierOutput, ProductSpec,
    QualityConfig, Result, ScaffoldPlan,
};

use crate::composer::compose_build_plan;
use crate::generators::{RouteGenerator, ScaffoldGenerator};
use crate::quality::{QualityResult, refine_build_plan, run_quality_gate};

/// Configuration for [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target: BuildTarget,
    pub catalog_dir: PathBuf,
    pub retrieval: RetrievalOptions,
    pub quality: QualityConfig,
    /// Refine and re-gate once when the first gate fails.
    pub auto_refine: bool,
    pub rules: Vec<Rule>,
    pub presets: Vec<Preset>,
}

impl PipelineConfig {
    /// Derive a pipeline config from the app config, with the given rule and
    /// preset tables.
    pub fn from_app_config(config: &AppConfig, rules: Vec<Rule>, presets: Vec<Preset>) -> Self {
        Self {
            target: config.defaults.target,
            catalog_dir: PathBuf::from(&config.defaults.catalog_dir),
            retrieval: RetrievalOptions {
                builtin_defaults: config.sources.builtin_catalog_defaults,
            },
            quality: QualityConfig::from(config),
            auto_refine: config.quality.auto_refine,
            rules,
            presets,
        }
    }
}

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    /// Free-text brief; classification and preset selection are skipped without it.
    pub brief: Option<String>,
    pub spec: ProductSpec,
}

/// Generators injected at the composition root.
pub struct Generators<'a> {
    pub routes: &'a dyn RouteGenerator,
    pub scaffold: &'a dyn ScaffoldGenerator,
}

/// Classification side of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub output: ClassifierOutput,
    pub preset: PresetMatch,
    pub theme: ThemePack,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// SHA-256 of the input spec's JSON.
    pub spec_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    pub matched_rules: Vec<String>,
    pub enhanced_spec: ProductSpec,
    pub catalog_source: IndexSource,
    pub catalog_items: usize,
    pub build_plan: BuildPlan,
    pub scaffold: ScaffoldPlan,
    pub quality: QualityResult,
    /// Whether the plan was refined after a failed first gate.
    pub refined: bool,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &PipelineReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &PipelineReport) {}
}

/// Hex SHA-256 of a spec's JSON form.
pub fn spec_fingerprint(spec: &ProductSpec) -> Result<String> {
    let json = serde_json::to_string(spec)
        .map_err(|e| AppForgeError::parse(format!("cannot serialize spec: {e}")))?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Run the full pipeline.
///
/// 1. Classify the brief and select a preset and theme (when a brief is given)
/// 2. Enhance the product spec with the rules matrix
/// 3. Retrieve catalog items for the target
/// 4. Compose the build plan and generate routes
/// 5. Scaffold and run the quality gate, refining once if allowed
#[instrument(skip_all, fields(app = %input.spec.app.name, target = %config.target))]
pub async fn run_pipeline(
    input: &PipelineInput,
    config: &PipelineConfig,
    generators: &Generators<'_>,
    progress: &dyn ProgressReporter,
) -> Result<PipelineReport> {
    let start = Instant::now();
    let run_id = Uuid::now_v7();
    let started_at = Utc::now();
    let spec_sha256 = spec_fingerprint(&input.spec)?;

    info!(%run_id, "starting pipeline");

    // --- Phase 1: Classification ---
    let classification = match input.brief.as_deref() {
        Some(brief) => {
            progress.phase("Classifying brief");
            let output = classify_brief(brief);
            let preset = select_preset(&output, &config.presets);
            let theme = choose_theme_pack(&output, &NormalizedBrief::new(brief), preset.default_theme);
            Some(Classification {
                output,
                preset,
                theme,
            })
        }
        None => None,
    };

    // --- Phase 2: Enhancement ---
    progress.phase("Applying rules matrix");
    let enhancement = enhance_spec(&input.spec, &config.rules)?;

    // --- Phase 3: Retrieval ---
    progress.phase("Retrieving catalog items");
    let retrieved = retrieve_from_catalog(
        &config.catalog_dir,
        &enhancement.spec,
        config.target,
        config.retrieval,
    )
    .await?;

    // --- Phase 4: Composition ---
    progress.phase("Composing build plan");
    let mut plan = compose_build_plan(&enhancement.spec, &retrieved.items, config.target);
    plan.theme = classification.as_ref().map(|c| c.theme.as_str().to_string());
    plan.routes = generators.routes.generate_routes(&plan)?;

    // --- Phase 5: Scaffold + gate ---
    progress.phase("Running quality gate");
    let mut scaffold = generators.scaffold.scaffold(&plan)?;
    let mut quality = run_quality_gate(&plan, &scaffold, &config.quality);
    let mut refined = false;

    if !quality.passed && config.auto_refine {
        progress.phase("Refining build plan");
        let candidate = refine_build_plan(&plan, &quality.issues);
        if candidate != plan {
            plan = candidate;
            plan.routes = generators.routes.generate_routes(&plan)?;
            scaffold = generators.scaffold.scaffold(&plan)?;
            quality = run_quality_gate(&plan, &scaffold, &config.quality);
            refined = true;
        }
    }

    if !quality.passed {
        warn!(score = quality.score, min_score = config.quality.min_score, "build plan did not pass the quality gate");
    }

    let report = PipelineReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        spec_sha256,
        classification,
        matched_rules: enhancement.matched,
        enhanced_spec: enhancement.spec,
        catalog_source: retrieved.source,
        catalog_items: retrieved.items.len(),
        build_plan: plan,
        scaffold,
        quality,
        refined,
    };

    info!(
        %run_id,
        score = report.quality.score,
        passed = report.quality.passed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline complete"
    );

    progress.done(&report);
    Ok(report)
}
