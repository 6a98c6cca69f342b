//! Application configuration for AppForge.
//!
//! User config lives at `~/.appforge/appforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppForgeError, Result};
use crate::plan::BuildTarget;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "appforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".appforge";

// ---------------------------------------------------------------------------
// Config structs (matching appforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Quality gate settings.
    #[serde(default)]
    pub quality: QualitySection,

    /// Locations of rule, preset, and catalog data.
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Build target used when none is given on the command line.
    #[serde(default)]
    pub target: BuildTarget,

    /// Directory holding the catalog index and per-category files.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target: BuildTarget::default(),
            catalog_dir: default_catalog_dir(),
        }
    }
}

fn default_catalog_dir() -> String {
    "catalog".into()
}

/// `[quality]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualitySection {
    /// Minimum score (0-100) for a plan to pass the gate.
    #[serde(default = "default_min_score")]
    pub min_score: i32,

    /// Fail the gate on any error-severity issue, whatever the score.
    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default = "default_true")]
    pub check_a11y: bool,

    #[serde(default = "default_true")]
    pub check_performance: bool,

    #[serde(default = "default_true")]
    pub check_security: bool,

    /// Apply the automatic refinement and re-run the gate when it fails.
    #[serde(default = "default_true")]
    pub auto_refine: bool,
}

impl Default for QualitySection {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            strict_mode: false,
            check_a11y: true,
            check_performance: true,
            check_security: true,
            auto_refine: true,
        }
    }
}

fn default_min_score() -> i32 {
    80
}
fn default_true() -> bool {
    true
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Rules matrix JSON file; the embedded matrix is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,

    /// Preset catalog JSON file; the embedded catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<String>,

    /// Fall back to built-in catalog entries when catalog files are missing.
    #[serde(default = "default_true")]
    pub builtin_catalog_defaults: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            presets_path: None,
            builtin_catalog_defaults: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Quality config (runtime)
// ---------------------------------------------------------------------------

/// Runtime quality gate configuration, merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityConfig {
    pub min_score: i32,
    pub strict_mode: bool,
    pub check_a11y: bool,
    pub check_performance: bool,
    pub check_security: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for QualityConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_score: config.quality.min_score,
            strict_mode: config.quality.strict_mode,
            check_a11y: config.quality.check_a11y,
            check_performance: config.quality.check_performance,
            check_security: config.quality.check_security,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.appforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.appforge/appforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppForgeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        AppForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if !(0..=100).contains(&config.quality.min_score) {
        return Err(AppForgeError::config(format!(
            "quality.min_score must be between 0 and 100, got {}",
            config.quality.min_score
        )));
    }

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AppForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AppForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AppForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("catalog_dir"));
        assert!(toml_str.contains("min_score = 80"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.target, BuildTarget::Hybrid);
        assert_eq!(parsed.quality.min_score, 80);
        assert!(parsed.sources.builtin_catalog_defaults);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
target = "erp"

[quality]
min_score = 90
strict_mode = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.target, BuildTarget::Erp);
        assert_eq!(config.defaults.catalog_dir, "catalog");
        assert!(config.quality.check_security);

        let quality = QualityConfig::from(&config);
        assert_eq!(quality.min_score, 90);
        assert!(quality.strict_mode);
    }

    #[test]
    fn out_of_range_min_score_rejected() {
        let path = std::env::temp_dir().join(format!("appforge_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, "[quality]\nmin_score = 140\n").expect("write temp config");
        let result = load_config_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.unwrap_err().to_string().contains("min_score"));
    }
}
