//! Static keyword-weight tables used by the classifier.
//!
//! Keywords are stored in normalized form (lowercase, single spaces, no
//! punctuation) and matched as plain substrings of the normalized brief.
//! Table order is significant: ties resolve to the earliest entry.

use appforge_shared::{Persona, ProductType, Vertical};

/// A keyword and the score it contributes when present in a brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordWeight {
    pub keyword: &'static str,
    pub weight: u32,
}

const fn kw(keyword: &'static str, weight: u32) -> KeywordWeight {
    KeywordWeight { keyword, weight }
}

/// Minimum summed weight for a product type to be chosen.
pub const PRODUCT_TYPE_THRESHOLD: u32 = 12;

/// Minimum summed weight for a persona to be chosen.
pub const PERSONA_THRESHOLD: u32 = 8;

/// Minimum summed weight for a vertical to be chosen.
pub const VERTICAL_THRESHOLD: u32 = 7;

/// Maximum number of keywords reported in a classification.
pub const MAX_KEYWORDS: usize = 40;

// ---------------------------------------------------------------------------
// Product types
// ---------------------------------------------------------------------------

pub static PRODUCT_TYPE_KEYWORDS: &[(ProductType, &[KeywordWeight])] = &[
    (
        ProductType::Crm,
        &[
            kw("crm", 12),
            kw("customer relationship", 12),
            kw("sales pipeline", 8),
            kw("sales team", 5),
            kw("leads", 5),
            kw("deals", 5),
            kw("contacts", 4),
            kw("sales", 3),
            kw("b2b", 2),
        ],
    ),
    (
        ProductType::Erp,
        &[
            kw("erp", 12),
            kw("enterprise resource", 12),
            kw("procurement", 6),
            kw("purchase orders", 6),
            kw("general ledger", 6),
            kw("supply chain", 5),
            kw("accounting", 4),
            kw("invoicing", 4),
        ],
    ),
    (
        ProductType::Hrm,
        &[
            kw("hrm", 12),
            kw("hris", 12),
            kw("human resources", 10),
            kw("payroll", 8),
            kw("employee onboarding", 6),
            kw("leave management", 6),
            kw("recruiting", 5),
            kw("employees", 3),
        ],
    ),
    (
        ProductType::Inventory,
        &[
            kw("inventory", 10),
            kw("stock levels", 8),
            kw("warehouse", 6),
            kw("barcode", 5),
            kw("sku", 5),
            kw("stock", 3),
        ],
    ),
    (
        ProductType::Ecommerce,
        &[
            kw("ecommerce", 12),
            kw("e commerce", 12),
            kw("online store", 10),
            kw("shopping cart", 8),
            kw("checkout", 6),
            kw("product catalog", 5),
            kw("shop", 3),
        ],
    ),
    (
        ProductType::Marketplace,
        &[
            kw("marketplace", 12),
            kw("two sided", 6),
            kw("vendors", 6),
            kw("sellers", 6),
            kw("buyers", 5),
            kw("commission", 4),
        ],
    ),
    (
        ProductType::Lms,
        &[
            kw("lms", 12),
            kw("learning management", 12),
            kw("online courses", 8),
            kw("courses", 5),
            kw("quizzes", 5),
            kw("lessons", 4),
            kw("students", 4),
        ],
    ),
    (
        ProductType::Helpdesk,
        &[
            kw("helpdesk", 12),
            kw("help desk", 12),
            kw("support tickets", 8),
            kw("ticketing", 8),
            kw("customer support", 6),
            kw("knowledge base", 4),
        ],
    ),
    (
        ProductType::ProjectManagement,
        &[
            kw("project management", 12),
            kw("kanban", 6),
            kw("sprints", 6),
            kw("gantt", 6),
            kw("milestones", 4),
            kw("tasks", 4),
        ],
    ),
    (
        ProductType::Analytics,
        &[
            kw("analytics", 10),
            kw("business intelligence", 10),
            kw("data visualization", 6),
            kw("dashboards", 6),
            kw("kpi", 5),
            kw("metrics", 4),
            kw("reports", 3),
        ],
    ),
    (
        ProductType::Fintech,
        &[
            kw("fintech", 12),
            kw("digital wallet", 8),
            kw("banking", 8),
            kw("trading", 6),
            kw("payments", 5),
            kw("loans", 5),
            kw("transactions", 4),
        ],
    ),
    (
        ProductType::Healthcare,
        &[
            kw("electronic health records", 12),
            kw("ehr", 10),
            kw("patient portal", 10),
            kw("telemedicine", 10),
            kw("patients", 5),
            kw("clinic", 5),
            kw("appointments", 3),
        ],
    ),
    (
        ProductType::Booking,
        &[
            kw("booking", 10),
            kw("reservations", 8),
            kw("scheduling", 6),
            kw("appointments", 5),
            kw("availability", 4),
            kw("calendar", 3),
        ],
    ),
    (
        ProductType::Community,
        &[
            kw("social network", 12),
            kw("community", 8),
            kw("forum", 8),
            kw("feed", 4),
            kw("members", 3),
            kw("groups", 3),
        ],
    ),
    (
        ProductType::Cms,
        &[
            kw("cms", 12),
            kw("content management", 12),
            kw("blog", 6),
            kw("articles", 5),
            kw("publishing", 5),
            kw("editorial", 5),
        ],
    ),
];

// ---------------------------------------------------------------------------
// Personas
// ---------------------------------------------------------------------------

pub static PERSONA_KEYWORDS: &[(Persona, &[KeywordWeight])] = &[
    (
        Persona::Enterprise,
        &[
            kw("enterprise", 8),
            kw("corporate", 5),
            kw("b2b", 4),
            kw("large teams", 4),
            kw("stakeholders", 3),
            kw("compliance", 3),
        ],
    ),
    (
        Persona::PowerUser,
        &[
            kw("power user", 8),
            kw("keyboard shortcuts", 6),
            kw("dense", 5),
            kw("bulk edit", 5),
            kw("advanced filters", 4),
            kw("spreadsheet", 4),
        ],
    ),
    (
        Persona::Minimal,
        &[
            kw("minimal", 8),
            kw("distraction free", 5),
            kw("clean", 5),
            kw("simple", 4),
            kw("whitespace", 3),
        ],
    ),
    (
        Persona::Creative,
        &[
            kw("creative", 8),
            kw("playful", 6),
            kw("vibrant", 5),
            kw("bold", 5),
            kw("artists", 4),
            kw("designers", 4),
        ],
    ),
    (
        Persona::Consumer,
        &[
            kw("consumer", 8),
            kw("shoppers", 5),
            kw("warm", 5),
            kw("families", 4),
            kw("friendly", 4),
            kw("everyday", 3),
        ],
    ),
    (
        Persona::Government,
        &[
            kw("government", 8),
            kw("public sector", 8),
            kw("ministry", 6),
            kw("municipal", 6),
            kw("citizens", 5),
            kw("agency", 3),
        ],
    ),
    (
        Persona::Developer,
        &[
            kw("developer", 8),
            kw("devtools", 6),
            kw("sdk", 5),
            kw("api docs", 4),
            kw("engineers", 4),
        ],
    ),
];

// ---------------------------------------------------------------------------
// Verticals
// ---------------------------------------------------------------------------

pub static VERTICAL_KEYWORDS: &[(Vertical, &[KeywordWeight])] = &[
    (
        Vertical::Finance,
        &[
            kw("finance", 7),
            kw("banking", 7),
            kw("fintech", 7),
            kw("trading", 5),
            kw("accounting", 5),
            kw("payments", 3),
            kw("invoices", 3),
        ],
    ),
    (
        Vertical::Healthcare,
        &[
            kw("healthcare", 7),
            kw("hospital", 7),
            kw("clinic", 6),
            kw("medical", 6),
            kw("patients", 6),
            kw("hipaa", 5),
        ],
    ),
    (
        Vertical::Education,
        &[
            kw("education", 7),
            kw("school", 6),
            kw("students", 6),
            kw("university", 6),
            kw("teachers", 5),
            kw("courses", 4),
        ],
    ),
    (
        Vertical::Retail,
        &[
            kw("retail", 7),
            kw("point of sale", 6),
            kw("merchandise", 5),
            kw("store", 4),
            kw("shop", 4),
        ],
    ),
    (
        Vertical::Logistics,
        &[
            kw("logistics", 7),
            kw("fleet", 6),
            kw("freight", 6),
            kw("delivery routes", 6),
            kw("shipping", 5),
            kw("warehouse", 5),
        ],
    ),
    (
        Vertical::Manufacturing,
        &[
            kw("manufacturing", 7),
            kw("factory", 6),
            kw("production line", 6),
            kw("bill of materials", 6),
            kw("plant", 3),
        ],
    ),
    (
        Vertical::RealEstate,
        &[
            kw("real estate", 7),
            kw("property", 5),
            kw("landlord", 5),
            kw("rentals", 5),
            kw("listings", 4),
            kw("brokers", 4),
        ],
    ),
    (
        Vertical::Hospitality,
        &[
            kw("hospitality", 7),
            kw("hotel", 7),
            kw("restaurant", 7),
            kw("reservations", 4),
            kw("guests", 4),
        ],
    ),
    (
        Vertical::Government,
        &[
            kw("government", 7),
            kw("public sector", 7),
            kw("municipal", 6),
            kw("citizens", 5),
            kw("permits", 5),
        ],
    ),
    (
        Vertical::Legal,
        &[
            kw("legal", 7),
            kw("law firm", 7),
            kw("case management", 6),
            kw("attorneys", 5),
            kw("contracts", 4),
        ],
    ),
];

// ---------------------------------------------------------------------------
// Delivery, platform, and constraint signals
// ---------------------------------------------------------------------------

/// Checked first; any hit means on-premise delivery.
pub static ON_PREMISE_KEYWORDS: &[&str] = &[
    "on premise",
    "on prem",
    "onprem",
    "self hosted",
    "air gapped",
    "airgapped",
    "own servers",
    "behind firewall",
    "private data center",
];

pub static SAAS_KEYWORDS: &[&str] = &[
    "saas",
    "multi tenant",
    "multitenant",
    "cloud hosted",
    "hosted service",
    "subscription",
];

pub static MOBILE_KEYWORDS: &[&str] = &[
    "mobile",
    "android",
    "iphone",
    "ipad",
    "ios app",
    "react native",
    "flutter",
    "smartphone",
    "tablet",
];

pub static DESKTOP_KEYWORDS: &[&str] = &[
    "desktop",
    "electron",
    "tauri",
    "windows app",
    "macos app",
    "linux app",
];

/// Latin keywords plus native-script names of right-to-left languages.
pub static RTL_KEYWORDS: &[&str] = &[
    "rtl",
    "right to left",
    "arabic",
    "hebrew",
    "farsi",
    "persian",
    "urdu",
    "عربي",
    "العربية",
    "עברית",
    "فارسی",
    "اردو",
];

pub static OFFLINE_KEYWORDS: &[&str] = &[
    "offline first",
    "offline",
    "no internet",
    "low connectivity",
    "poor connectivity",
    "sync when online",
];

pub static HEADLESS_KEYWORDS: &[&str] = &[
    "headless",
    "api only",
    "api first",
    "no frontend",
    "backend only",
];

// ---------------------------------------------------------------------------
// Must-have defaults
// ---------------------------------------------------------------------------

/// Features every product of the given type is expected to ship with.
pub fn must_have_for(product_type: ProductType) -> &'static [&'static str] {
    match product_type {
        ProductType::Crm => &["contacts", "deal-pipeline", "activity-timeline", "sales-reports"],
        ProductType::Erp => &["general-ledger", "purchase-orders", "inventory-sync", "approvals"],
        ProductType::Hrm => &["employee-directory", "leave-requests", "payroll-export", "org-chart"],
        ProductType::Inventory => &["stock-levels", "sku-catalog", "stock-movements", "reorder-alerts"],
        ProductType::Ecommerce => &["product-catalog", "cart", "checkout", "order-history"],
        ProductType::Marketplace => &["seller-onboarding", "listings", "checkout", "payouts"],
        ProductType::Lms => &["course-catalog", "lessons", "quizzes", "progress-tracking"],
        ProductType::Helpdesk => &["ticket-inbox", "sla-timers", "knowledge-base", "canned-replies"],
        ProductType::ProjectManagement => &["projects", "task-board", "milestones", "time-tracking"],
        ProductType::Analytics => &["dashboards", "report-builder", "data-sources", "scheduled-exports"],
        ProductType::Fintech => &["accounts", "transactions", "kyc", "statements"],
        ProductType::Healthcare => &["patient-records", "appointments", "consent-forms", "audit-log"],
        ProductType::Booking => &["availability-calendar", "reservations", "reminders", "cancellations"],
        ProductType::Community => &["member-profiles", "feed", "groups", "moderation"],
        ProductType::Cms => &["content-editor", "media-library", "publishing-workflow", "seo-settings"],
        ProductType::Generic => &["authentication", "user-settings", "dashboard"],
    }
}
