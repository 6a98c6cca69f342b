//! Route and scaffold generators injected into the pipeline.
//!
//! Real code emission happens outside this workspace. The built-in generators
//! only describe what would be produced so the quality gate has something to
//! score.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use appforge_shared::{AppForgeError, BuildPlan, Platform, Result, RouteEntry, ScaffoldPlan, UiAdapter};

use crate::composer::profile_for_app;

/// Expands build plan pages into concrete routes.
pub trait RouteGenerator: Send + Sync {
    fn generate_routes(&self, plan: &BuildPlan) -> Result<Vec<RouteEntry>>;
}

/// Produces the file and dependency list for a build plan.
pub trait ScaffoldGenerator: Send + Sync {
    fn scaffold(&self, plan: &BuildPlan) -> Result<ScaffoldPlan>;
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Lowercase a page name into a URL segment.
fn slug(page: &str) -> String {
    page.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// One route per app page, under the app's base path. `home` maps to the base.
///
/// Pages without a usable URL segment are skipped. Pages that slug to an
/// already-routed path keep the first route.
#[derive(Debug, Default)]
pub struct PageRouteGenerator;

impl RouteGenerator for PageRouteGenerator {
    fn generate_routes(&self, plan: &BuildPlan) -> Result<Vec<RouteEntry>> {
        let mut routes = Vec::new();
        let mut seen = HashSet::new();
        for app in &plan.apps {
            let base = profile_for_app(&app.name)
                .map(|p| p.base_path().to_string())
                .unwrap_or_else(|| format!("/{}", slug(&app.name)));

            for page in &app.pages {
                let segment = slug(page);
                if segment.is_empty() {
                    warn!(app = %app.name, page = %page, "page has no usable route segment, skipping");
                    continue;
                }
                let path = match (base.as_str(), segment.as_str()) {
                    (base, "home") => base.to_string(),
                    ("/", seg) => format!("/{seg}"),
                    (base, seg) => format!("{base}/{seg}"),
                };
                if !seen.insert(path.clone()) {
                    debug!(app = %app.name, page = %page, %path, "duplicate route path, skipping");
                    continue;
                }
                routes.push(RouteEntry {
                    path,
                    app: app.name.clone(),
                    page: page.clone(),
                });
            }
        }
        debug!(routes = routes.len(), "routes generated");
        Ok(routes)
    }
}

// ---------------------------------------------------------------------------
// Scaffolds
// ---------------------------------------------------------------------------

fn adapter_dependencies(adapter: UiAdapter) -> &'static [&'static str] {
    match adapter {
        UiAdapter::Shadcn => &["tailwindcss", "@radix-ui/react-slot", "class-variance-authority"],
        UiAdapter::Antd => &["antd", "@ant-design/icons"],
    }
}

fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Lists the files and packages a project writer would emit. Writes nothing.
#[derive(Debug, Default)]
pub struct ManifestScaffolder;

impl ScaffoldGenerator for ManifestScaffolder {
    fn scaffold(&self, plan: &BuildPlan) -> Result<ScaffoldPlan> {
        let mut files = Vec::new();
        let mut dependencies = Vec::new();

        if !plan.apps.is_empty() {
            push_unique(&mut dependencies, "react");
            push_unique(&mut dependencies, "react-dom");
        }

        for app in &plan.apps {
            let root = format!("apps/{}", slug(&app.name));
            push_unique(&mut files, format!("{root}/package.json"));
            push_unique(&mut files, format!("{root}/src/main.tsx"));
            for page in app.pages.iter().map(|p| slug(p)).filter(|s| !s.is_empty()) {
                push_unique(&mut files, format!("{root}/src/pages/{page}.tsx"));
            }
            for block in &app.blocks {
                push_unique(&mut files, format!("{root}/src/blocks/{block}.tsx"));
            }
            for dep in adapter_dependencies(app.adapter) {
                push_unique(&mut dependencies, *dep);
            }
        }

        for platform in &plan.platforms {
            match platform {
                Platform::Web => {}
                Platform::Mobile => {
                    push_unique(&mut files, "apps/mobile/app.json");
                    push_unique(&mut dependencies, "react-native");
                }
                Platform::Desktop => {
                    push_unique(&mut files, "apps/desktop/main.ts");
                    push_unique(&mut dependencies, "electron");
                }
            }
        }

        debug!(files = files.len(), dependencies = dependencies.len(), "scaffold listed");
        Ok(ScaffoldPlan {
            files,
            dependencies,
        })
    }
}

/// Reads a scaffold plan produced by an external project writer.
#[derive(Debug, Clone)]
pub struct FileScaffold {
    path: PathBuf,
}

impl FileScaffold {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScaffoldGenerator for FileScaffold {
    fn scaffold(&self, _plan: &BuildPlan) -> Result<ScaffoldPlan> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| AppForgeError::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            AppForgeError::Generator(format!(
                "invalid scaffold plan {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose_build_plan;
    use appforge_shared::{BuildTarget, ProductSpec};

    fn plan(target: BuildTarget) -> BuildPlan {
        let spec = ProductSpec::from_json(
            r#"{"app": {"name": "Ops"}, "platforms": ["web", "mobile"], "modules": ["Purchase Orders"]}"#,
        )
        .unwrap();
        compose_build_plan(&spec, &[], target)
    }

    #[test]
    fn routes_use_profile_base_paths() {
        let routes = PageRouteGenerator.generate_routes(&plan(BuildTarget::Hybrid)).unwrap();
        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/",
                "/pricing",
                "/features",
                "/contact",
                "/app/dashboard",
                "/app/purchase-orders",
            ]
        );
        assert_eq!(routes[5].page, "Purchase Orders");
        assert_eq!(routes[5].app, "erp");
    }

    #[test]
    fn symbol_only_pages_are_skipped() {
        let mut plan = plan(BuildTarget::Erp);
        plan.apps[0].pages.push("  ".into());
        plan.apps[0].pages.push("???".into());
        let routes = PageRouteGenerator.generate_routes(&plan).unwrap();
        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/app/dashboard", "/app/purchase-orders"]);

        let scaffold = ManifestScaffolder.scaffold(&plan).unwrap();
        assert!(!scaffold.files.iter().any(|f| f.ends_with("/.tsx")));
    }

    #[test]
    fn colliding_slugs_route_once() {
        let mut plan = plan(BuildTarget::Erp);
        plan.apps[0].pages.push("purchase-orders".into());
        plan.apps[0].pages.push("Dashboard".into());
        let routes = PageRouteGenerator.generate_routes(&plan).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].path, "/app/purchase-orders");
        assert_eq!(routes[1].page, "Purchase Orders");
    }

    #[test]
    fn manifest_lists_pages_and_adapter_deps() {
        let scaffold = ManifestScaffolder.scaffold(&plan(BuildTarget::Erp)).unwrap();
        assert!(scaffold.files.contains(&"apps/erp/src/pages/purchase-orders.tsx".to_string()));
        assert!(scaffold.files.contains(&"apps/mobile/app.json".to_string()));
        assert!(scaffold.dependencies.contains(&"antd".to_string()));
        assert!(scaffold.dependencies.contains(&"react-native".to_string()));
        assert!(!scaffold.dependencies.contains(&"tailwindcss".to_string()));
    }

    #[test]
    fn file_scaffold_reads_json() {
        let path = std::env::temp_dir().join(format!("appforge_scaffold_{}.json", uuid::Uuid::now_v7()));
        std::fs::write(&path, r#"{"files": ["src/index.ts"], "dependencies": ["react"]}"#).unwrap();

        let scaffold = FileScaffold::new(&path).scaffold(&plan(BuildTarget::Erp)).unwrap();
        assert_eq!(scaffold.files, vec!["src/index.ts"]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_scaffold_missing_file_is_io_error() {
        let scaffold = FileScaffold::new("/nonexistent/appforge/scaffold.json");
        let err = scaffold.scaffold(&plan(BuildTarget::Erp)).unwrap_err();
        assert!(matches!(err, AppForgeError::Io { .. }));
    }
}
