//! Classification domain types produced from a product brief.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ProductType
// ---------------------------------------------------------------------------

/// Kind of application a brief describes.
///
/// Declaration order matters: the classifier breaks score ties in favour of
/// the type declared first in its keyword table, which follows this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    Crm,
    Erp,
    Hrm,
    Inventory,
    Ecommerce,
    Marketplace,
    Lms,
    Helpdesk,
    ProjectManagement,
    Analytics,
    Fintech,
    Healthcare,
    Booking,
    Community,
    Cms,
    /// Fallback when no type scores above the classification threshold.
    Generic,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crm => "crm",
            Self::Erp => "erp",
            Self::Hrm => "hrm",
            Self::Inventory => "inventory",
            Self::Ecommerce => "ecommerce",
            Self::Marketplace => "marketplace",
            Self::Lms => "lms",
            Self::Helpdesk => "helpdesk",
            Self::ProjectManagement => "project-management",
            Self::Analytics => "analytics",
            Self::Fintech => "fintech",
            Self::Healthcare => "healthcare",
            Self::Booking => "booking",
            Self::Community => "community",
            Self::Cms => "cms",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Delivery / deployment
// ---------------------------------------------------------------------------

/// How the product is delivered to its customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryMode {
    OnPremise,
    #[default]
    #[serde(rename = "multiTenantSaaS")]
    MultiTenantSaaS,
}

impl DeliveryMode {
    /// The other delivery mode; used to detect preset conflicts.
    pub fn opposite(&self) -> Self {
        match self {
            Self::OnPremise => Self::MultiTenantSaaS,
            Self::MultiTenantSaaS => Self::OnPremise,
        }
    }

    /// Deployment model implied by the delivery mode.
    pub fn deployment(&self) -> Deployment {
        match self {
            Self::OnPremise => Deployment::SelfHosted,
            Self::MultiTenantSaaS => Deployment::Cloud,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnPremise => "onPremise",
            Self::MultiTenantSaaS => "multiTenantSaaS",
        }
    }
}

/// Where the application runs, derived from [`DeliveryMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Deployment {
    SelfHosted,
    Cloud,
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// A client platform the product must ship on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Mobile,
    Desktop,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Persona / vertical
// ---------------------------------------------------------------------------

/// Tone/archetype signal of the brief, used for theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    Enterprise,
    PowerUser,
    Minimal,
    Creative,
    Consumer,
    Government,
    Developer,
    #[default]
    General,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::PowerUser => "power-user",
            Self::Minimal => "minimal",
            Self::Creative => "creative",
            Self::Consumer => "consumer",
            Self::Government => "government",
            Self::Developer => "developer",
            Self::General => "general",
        }
    }
}

/// Industry/domain the product serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vertical {
    Finance,
    Healthcare,
    Education,
    Retail,
    Logistics,
    Manufacturing,
    RealEstate,
    Hospitality,
    Government,
    Legal,
    #[default]
    General,
}

impl Vertical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Retail => "retail",
            Self::Logistics => "logistics",
            Self::Manufacturing => "manufacturing",
            Self::RealEstate => "real-estate",
            Self::Hospitality => "hospitality",
            Self::Government => "government",
            Self::Legal => "legal",
            Self::General => "general",
        }
    }
}

// ---------------------------------------------------------------------------
// ClassifierOutput
// ---------------------------------------------------------------------------

/// Technical constraints inferred from the brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(rename = "noExternalCDN")]
    pub no_external_cdn: bool,
    pub offline_first: bool,
    pub sso: bool,
    pub headless: bool,
    pub strict_audit: bool,
}

/// Structured signal set extracted from a free-text product brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierOutput {
    pub product_type: ProductType,
    pub delivery_mode: DeliveryMode,
    pub deployment: Deployment,
    /// Ordered platform set; `web` is always first.
    pub platforms: Vec<Platform>,
    pub rtl: bool,
    pub persona: Persona,
    pub vertical: Vertical,
    /// Matched keywords in first-seen order, at most 40.
    pub keywords: Vec<String>,
    pub must_have: Vec<String>,
    pub constraints: Constraints,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_mode_wire_names() {
        let json = serde_json::to_string(&DeliveryMode::MultiTenantSaaS).expect("serialize");
        assert_eq!(json, "\"multiTenantSaaS\"");
        let parsed: DeliveryMode = serde_json::from_str("\"onPremise\"").expect("deserialize");
        assert_eq!(parsed, DeliveryMode::OnPremise);
        assert_eq!(parsed.deployment(), Deployment::SelfHosted);
    }

    #[test]
    fn product_type_names_match_serde() {
        for ty in [ProductType::Crm, ProductType::ProjectManagement, ProductType::Generic] {
            let json = serde_json::to_string(&ty).expect("serialize");
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn constraints_serialize_cdn_flag() {
        let c = Constraints {
            no_external_cdn: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(json.contains("\"noExternalCDN\":true"));
        assert!(json.contains("\"offlineFirst\":false"));
    }
}
