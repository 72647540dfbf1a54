//! Static site structure: sections, navigation and experience roles.

use folio_ui::{DropdownMarkup, NavEntry, NavLink, NavMarkup};

pub const EXPERIENCE_DROPDOWN: &str = "experience";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub slug: &'static str,
    pub organisation: &'static str,
    pub summary: &'static str,
    pub highlights: &'static [&'static str],
}

impl Role {
    pub fn href(&self) -> String {
        format!("/roles/{}", self.slug)
    }
}

pub const ROLES: &[Role] = &[
    Role {
        slug: "siak-cars",
        organisation: "Siak Cars",
        summary: "Built and ran the booking and fleet tooling for a vehicle hire business.",
        highlights: &[
            "Online booking flow and availability checks",
            "Fleet and maintenance records",
            "Customer contact and invoicing",
        ],
    },
    Role {
        slug: "ukhsa",
        organisation: "UK Health Security Agency",
        summary: "Delivered data services supporting public health reporting.",
        highlights: &[
            "Data pipelines for reporting dashboards",
            "Cloud infrastructure and deployment automation",
            "Working within public sector security standards",
        ],
    },
    Role {
        slug: "intuit",
        organisation: "Intuit",
        summary: "Worked on financial software used by small businesses.",
        highlights: &[
            "Service integrations and API work",
            "Testing and release quality",
            "Cross-team delivery in an agile setting",
        ],
    },
    Role {
        slug: "optima-health",
        organisation: "Optima Health",
        summary: "Supported occupational health platforms and internal systems.",
        highlights: &[
            "Internal web applications",
            "Reporting and data quality",
            "User support and onboarding",
        ],
    },
    Role {
        slug: "minor-weir-willis",
        organisation: "Minor, Weir & Willis",
        summary: "Maintained line of business systems for a wholesale distributor.",
        highlights: &[
            "Stock and order processing tools",
            "Database administration",
            "Process automation",
        ],
    },
];

pub fn role(slug: &str) -> Option<&'static Role> {
    ROLES.iter().find(|role| role.slug == slug)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Projects,
    Skills,
    About,
    Certificates,
    Contact,
    Role(&'static Role),
}

impl Section {
    /// The navigation href marked as current for this section.
    pub fn current_href(&self) -> String {
        match self {
            Section::Home => "/".to_string(),
            Section::Projects => "/projects".to_string(),
            Section::Skills => "/skills".to_string(),
            Section::About => "/about".to_string(),
            Section::Certificates => "/certificates".to_string(),
            Section::Contact => "/contact".to_string(),
            Section::Role(role) => role.href(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Section::Home => "Home".to_string(),
            Section::Projects => "Projects".to_string(),
            Section::Skills => "Skills".to_string(),
            Section::About => "About".to_string(),
            Section::Certificates => "Certificates".to_string(),
            Section::Contact => "Contact".to_string(),
            Section::Role(role) => role.organisation.to_string(),
        }
    }
}

pub fn site_nav() -> NavMarkup {
    let roles = ROLES
        .iter()
        .map(|role| NavLink::new(role.organisation, role.href()))
        .collect();

    NavMarkup::new(vec![
        NavEntry::Link(NavLink::new("Home", "/")),
        NavEntry::Link(NavLink::new("Projects", "/projects")),
        NavEntry::Link(NavLink::new("Skills", "/skills")),
        NavEntry::Dropdown(DropdownMarkup::new(
            EXPERIENCE_DROPDOWN,
            NavLink::new("Experience", "/about"),
            roles,
        )),
        NavEntry::Link(NavLink::new("Certificates", "/certificates")),
        NavEntry::Link(NavLink::new("Contact", "/contact")),
    ])
}
