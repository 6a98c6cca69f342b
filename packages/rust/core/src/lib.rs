//! Build plan composition, quality gate, and pipeline orchestration for AppForge.
//!
//! This crate ties together classification, preset selection, spec
//! enhancement, and catalog retrieval into end-to-end runs (`run_pipeline`).

pub mod composer;
pub mod generators;
pub mod pipeline;
pub mod quality;

pub use composer::{ErpProfile, MarketingProfile, TargetProfile, compose_build_plan, profile_for_app, profiles_for};
pub use generators::{FileScaffold, ManifestScaffolder, PageRouteGenerator, RouteGenerator, ScaffoldGenerator};
pub use pipeline::{
    Classification, Generators, PipelineConfig, PipelineInput, PipelineReport, ProgressReporter,
    SilentProgress, run_pipeline, spec_fingerprint,
};
pub use quality::{QualityIssue, QualityResult, Severity, refine_build_plan, run_quality_gate};
