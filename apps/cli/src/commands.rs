//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use appforge_catalog::{RetrievalOptions, retrieve_from_catalog};
use appforge_classifier::{NormalizedBrief, classify_brief};
use appforge_core::{
    Classification, FileScaffold, Generators, ManifestScaffolder, PageRouteGenerator,
    PipelineConfig, PipelineInput, PipelineReport, ProgressReporter, RouteGenerator,
    ScaffoldGenerator, compose_build_plan, run_pipeline, run_quality_gate,
};
use appforge_presets::{Preset, builtin_presets, choose_theme_pack, load_presets_from, select_preset};
use appforge_rules::{Rule, builtin_rules, enhance_spec, load_rules_from};
use appforge_shared::{
    AppConfig, BuildPlan, BuildTarget, ProductSpec, QualityConfig, ScaffoldPlan, init_config,
    load_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// AppForge: compile product briefs into build plans.
#[derive(Parser)]
#[command(
    name = "appforge",
    version,
    about = "Classify app briefs, enhance product specs, and compose quality-gated build plans.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write JSON output to this file instead of stdout.
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Where a brief comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct BriefSource {
    /// Brief text.
    #[arg(long)]
    brief: Option<String>,

    /// File containing the brief text.
    #[arg(long)]
    brief_file: Option<PathBuf>,
}

/// Build target and catalog location overrides.
#[derive(Args)]
pub(crate) struct PlanArgs {
    /// Build target: hybrid, erp, or marketing (defaults to config).
    #[arg(short, long)]
    target: Option<BuildTarget>,

    /// Catalog directory (defaults to config).
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Quality gate overrides.
#[derive(Args)]
pub(crate) struct GateArgs {
    /// Minimum passing score (defaults to config).
    #[arg(long)]
    min_score: Option<i32>,

    /// Fail on any error-severity issue.
    #[arg(long)]
    strict: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Classify a brief and select a preset and theme.
    Classify {
        #[command(flatten)]
        source: BriefSource,
    },

    /// Apply the rules matrix to a product spec.
    Enhance {
        /// Product spec JSON file.
        #[arg(long)]
        spec: PathBuf,
    },

    /// Enhance a spec and compose a build plan with routes.
    Plan {
        /// Product spec JSON file.
        #[arg(long)]
        spec: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Score a build plan and scaffold plan with the quality gate.
    Gate {
        /// Build plan JSON file.
        #[arg(long)]
        plan: PathBuf,

        /// Scaffold plan JSON file.
        #[arg(long)]
        scaffold: PathBuf,

        #[command(flatten)]
        gate: GateArgs,
    },

    /// Run the whole pipeline.
    Run {
        /// Product spec JSON file.
        #[arg(long)]
        spec: PathBuf,

        /// Optional brief used for preset and theme selection.
        #[arg(long)]
        brief: Option<String>,

        /// Externally produced scaffold plan; listed from the build plan when omitted.
        #[arg(long)]
        scaffold: Option<PathBuf>,

        /// Skip refinement when the gate fails.
        #[arg(long)]
        no_refine: bool,

        #[command(flatten)]
        plan: PlanArgs,

        #[command(flatten)]
        gate: GateArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "appforge=info",
        1 => "appforge=debug",
        _ => "appforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so JSON output on stdout stays parseable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let out = cli.out.as_deref();
    match cli.command {
        Command::Classify { source } => cmd_classify(&source, out).await,
        Command::Enhance { spec } => cmd_enhance(&spec, out).await,
        Command::Plan { spec, plan } => cmd_plan(&spec, &plan, out).await,
        Command::Gate {
            plan,
            scaffold,
            gate,
        } => cmd_gate(&plan, &scaffold, &gate, out).await,
        Command::Run {
            spec,
            brief,
            scaffold,
            no_refine,
            plan,
            gate,
        } => {
            cmd_run(
                &spec,
                brief,
                scaffold.as_deref(),
                no_refine,
                &plan,
                &gate,
                out,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read {what} {}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| eyre!("invalid {what} {}: {e}", path.display()))
}

fn read_spec(path: &Path) -> Result<ProductSpec> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read spec {}", path.display()))?;
    Ok(ProductSpec::from_json(&content)?)
}

fn load_rules(config: &AppConfig) -> Result<Vec<Rule>> {
    match &config.sources.rules_path {
        Some(path) => Ok(load_rules_from(Path::new(path))?),
        None => Ok(builtin_rules().to_vec()),
    }
}

fn load_presets(config: &AppConfig) -> Result<Vec<Preset>> {
    match &config.sources.presets_path {
        Some(path) => Ok(load_presets_from(Path::new(path))?),
        None => Ok(builtin_presets().to_vec()),
    }
}

fn quality_config(config: &AppConfig, gate: &GateArgs) -> Result<QualityConfig> {
    let mut quality = QualityConfig::from(config);
    if let Some(min_score) = gate.min_score {
        if !(0..=100).contains(&min_score) {
            return Err(eyre!("--min-score must be between 0 and 100, got {min_score}"));
        }
        quality.min_score = min_score;
    }
    quality.strict_mode |= gate.strict;
    Ok(quality)
}

fn resolve_target(config: &AppConfig, plan: &PlanArgs) -> (BuildTarget, PathBuf) {
    let target = plan.target.unwrap_or(config.defaults.target);
    let catalog = plan
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.catalog_dir));
    (target, catalog)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_classify(source: &BriefSource, out: Option<&Path>) -> Result<()> {
    let brief = match (&source.brief, &source.brief_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read brief {}", path.display()))?,
        (None, None) => return Err(eyre!("either --brief or --brief-file is required")),
    };

    let config = load_config()?;
    let presets = load_presets(&config)?;

    let output = classify_brief(&brief);
    let preset = select_preset(&output, &presets);
    let theme = choose_theme_pack(&output, &NormalizedBrief::new(&brief), preset.default_theme);

    info!(product_type = %output.product_type, preset = %preset.preset_id, theme = theme.as_str(), "brief classified");

    emit(
        &Classification {
            output,
            preset,
            theme,
        },
        out,
    )
}

async fn cmd_enhance(spec_path: &Path, out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let rules = load_rules(&config)?;
    let spec = read_spec(spec_path)?;

    let enhancement = enhance_spec(&spec, &rules)?;
    emit(&enhancement, out)
}

async fn cmd_plan(spec_path: &Path, args: &PlanArgs, out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let rules = load_rules(&config)?;
    let spec = read_spec(spec_path)?;
    let (target, catalog) = resolve_target(&config, args);

    let enhancement = enhance_spec(&spec, &rules)?;
    let retrieved = retrieve_from_catalog(
        &catalog,
        &enhancement.spec,
        target,
        RetrievalOptions {
            builtin_defaults: config.sources.builtin_catalog_defaults,
        },
    )
    .await?;

    let mut plan: BuildPlan = compose_build_plan(&enhancement.spec, &retrieved.items, target);
    plan.routes = PageRouteGenerator.generate_routes(&plan)?;
    emit(&plan, out)
}

async fn cmd_gate(
    plan_path: &Path,
    scaffold_path: &Path,
    gate: &GateArgs,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config()?;
    let quality = quality_config(&config, gate)?;
    let plan: BuildPlan = read_json(plan_path, "build plan")?;
    let scaffold: ScaffoldPlan = read_json(scaffold_path, "scaffold plan")?;

    let result = run_quality_gate(&plan, &scaffold, &quality);
    emit(&result, out)
}

async fn cmd_run(
    spec_path: &Path,
    brief: Option<String>,
    scaffold_path: Option<&Path>,
    no_refine: bool,
    plan: &PlanArgs,
    gate: &GateArgs,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config()?;
    let spec = read_spec(spec_path)?;

    let mut pipeline = PipelineConfig::from_app_config(&config, load_rules(&config)?, load_presets(&config)?);
    let (target, catalog) = resolve_target(&config, plan);
    pipeline.target = target;
    pipeline.catalog_dir = catalog;
    pipeline.quality = quality_config(&config, gate)?;
    pipeline.auto_refine &= !no_refine;

    let file_scaffold = scaffold_path.map(FileScaffold::new);
    let scaffolder: &dyn ScaffoldGenerator = match &file_scaffold {
        Some(file) => file,
        None => &ManifestScaffolder,
    };
    let generators = Generators {
        routes: &PageRouteGenerator,
        scaffold: scaffolder,
    };

    info!(spec = %spec_path.display(), target = %target, "running pipeline");

    let reporter = CliProgress::new();
    let input = PipelineInput { brief, spec };
    let report = run_pipeline(&input, &pipeline, &generators, &reporter).await?;

    eprintln!();
    eprintln!("  Run:     {}", report.run_id);
    eprintln!("  Apps:    {}", report.build_plan.apps.len());
    eprintln!("  Pages:   {}", report.build_plan.page_count());
    eprintln!("  Rules:   {}", report.matched_rules.len());
    eprintln!(
        "  Quality: {} ({})",
        report.quality.score,
        if report.quality.passed { "passed" } else { "failed" }
    );
    eprintln!();

    emit(&report, out)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &PipelineReport) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
