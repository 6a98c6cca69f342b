//! Build plan composition: enhanced spec + retrieved catalog items → [`BuildPlan`].
//!
//! Each build target is described by a [`TargetProfile`]. A hybrid target
//! composes both the marketing and the ERP profile; the others compose one.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use appforge_shared::{
    AppPlan, AtomKind, BlockSets, BuildPlan, BuildTarget, CatalogItem, CatalogItemType, Persona,
    ProductSpec, UiAdapter,
};

// ---------------------------------------------------------------------------
// Target profiles
// ---------------------------------------------------------------------------

/// How one application family is laid out in a build plan.
pub trait TargetProfile: Send + Sync {
    /// App name as it appears in [`AppPlan::name`].
    fn app_name(&self) -> &'static str;

    /// UI component library the app renders with.
    fn adapter(&self) -> UiAdapter;

    /// URL prefix of the app's routes.
    fn base_path(&self) -> &'static str;

    /// Pages the app exposes for a given spec.
    fn pages(&self, spec: &ProductSpec) -> Vec<String>;

    /// Block ids placed in the app.
    fn default_blocks(&self) -> &'static [&'static str];
}

/// Public-facing site rendered with shadcn.
pub struct MarketingProfile;

impl TargetProfile for MarketingProfile {
    fn app_name(&self) -> &'static str {
        "marketing"
    }

    fn adapter(&self) -> UiAdapter {
        UiAdapter::Shadcn
    }

    fn base_path(&self) -> &'static str {
        "/"
    }

    fn pages(&self, _spec: &ProductSpec) -> Vec<String> {
        ["home", "pricing", "features", "contact"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_blocks(&self) -> &'static [&'static str] {
        &[
            "marketing-hero-split",
            "feature-grid-icons",
            "pricing-three-tier",
            "testimonial-carousel",
        ]
    }
}

/// Back-office app rendered with antd; one page per spec module.
pub struct ErpProfile;

impl TargetProfile for ErpProfile {
    fn app_name(&self) -> &'static str {
        "erp"
    }

    fn adapter(&self) -> UiAdapter {
        UiAdapter::Antd
    }

    fn base_path(&self) -> &'static str {
        "/app"
    }

    fn pages(&self, spec: &ProductSpec) -> Vec<String> {
        let mut pages = vec!["dashboard".to_string()];
        for module in &spec.modules {
            if !pages.contains(module) {
                pages.push(module.clone());
            }
        }
        pages
    }

    fn default_blocks(&self) -> &'static [&'static str] {
        &["erp-sidebar-nav", "erp-kpi-strip", "record-detail-tabs"]
    }
}

static MARKETING: MarketingProfile = MarketingProfile;
static ERP: ErpProfile = ErpProfile;

/// Profiles composed for a build target, in app order.
pub fn profiles_for(target: BuildTarget) -> Vec<&'static dyn TargetProfile> {
    let marketing: &'static dyn TargetProfile = &MARKETING;
    let erp: &'static dyn TargetProfile = &ERP;
    match target {
        BuildTarget::Hybrid => vec![marketing, erp],
        BuildTarget::Marketing => vec![marketing],
        BuildTarget::Erp => vec![erp],
    }
}

/// Look up the profile that produced an app by its name.
pub fn profile_for_app(name: &str) -> Option<&'static dyn TargetProfile> {
    let profiles: [&'static dyn TargetProfile; 2] = [&MARKETING, &ERP];
    profiles
        .into_iter()
        .find(|p| p.app_name() == name)
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Atom variants keyed by kind; the first catalog item of each kind wins.
fn extract_atoms(items: &[CatalogItem]) -> BTreeMap<AtomKind, String> {
    let mut atoms = BTreeMap::new();
    for item in items.iter().filter(|i| i.item_type == CatalogItemType::Atom) {
        match AtomKind::from_item_id(&item.id) {
            Some(kind) => {
                atoms.entry(kind).or_insert_with(|| item.variant_id.clone());
            }
            None => debug!(id = %item.id, "dropping unrecognized atom"),
        }
    }
    atoms
}

/// Compose a build plan for `target`.
///
/// App blocks come from each profile's static list. The retrieved block items
/// are not consulted.
#[instrument(skip_all, fields(app = %spec.app.name, target = %target, items = catalog_items.len()))]
pub fn compose_build_plan(
    spec: &ProductSpec,
    catalog_items: &[CatalogItem],
    target: BuildTarget,
) -> BuildPlan {
    let mut apps = Vec::new();
    let mut blocks = BlockSets::default();

    for profile in profiles_for(target) {
        let app_blocks: Vec<String> = profile
            .default_blocks()
            .iter()
            .map(|b| b.to_string())
            .collect();

        match profile.app_name() {
            "marketing" => blocks.marketing = app_blocks.clone(),
            "erp" => blocks.erp = app_blocks.clone(),
            _ => {}
        }

        apps.push(AppPlan {
            name: profile.app_name().to_string(),
            adapter: profile.adapter(),
            pages: profile.pages(spec),
            blocks: app_blocks,
        });
    }

    let plan = BuildPlan {
        target,
        // TODO: derive persona from the product spec once ProductSpec carries a persona field.
        persona: Persona::Enterprise,
        platforms: spec.platforms.clone(),
        apps,
        atoms: extract_atoms(catalog_items),
        blocks,
        components: spec.ui_components.clone(),
        routes: Vec::new(),
        theme: None,
    };

    info!(
        apps = plan.apps.len(),
        pages = plan.page_count(),
        atoms = plan.atoms.len(),
        "build plan composed"
    );

    plan
}
