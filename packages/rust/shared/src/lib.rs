//! Shared types, error model, and configuration for AppForge.
//!
//! This crate is the foundation depended on by all other AppForge crates.
//! It provides:
//! - [`AppForgeError`]: the unified error type
//! - Classification types ([`ClassifierOutput`], [`ProductType`], [`Persona`], ...)
//! - The input/output documents of the pipeline ([`ProductSpec`], [`CatalogItem`],
//!   [`BuildPlan`], [`ScaffoldPlan`])
//! - Configuration ([`AppConfig`], [`QualityConfig`], config loading)

pub mod config;
pub mod error;
pub mod plan;
pub mod spec;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, QualityConfig, QualitySection, SourcesConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{AppForgeError, Result};
pub use plan::{
    AppPlan, AtomKind, BlockSets, BuildPlan, BuildTarget, CatalogItem,
    CatalogItemType, RouteEntry, ScaffoldPlan, UiAdapter,
};
pub use spec::{AppMeta, ProductSpec, SecurityConfig, append_unique};
pub use types::{
    ClassifierOutput, Constraints, DeliveryMode, Deployment, Persona, Platform, ProductType,
    Vertical,
};
