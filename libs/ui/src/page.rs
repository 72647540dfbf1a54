use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct DropdownId(pub String);

impl fmt::Display for DropdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DropdownId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DropdownId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// A navigation item that is both a link and a submenu disclosure.
///
/// `toggle` is `None` when the rendered markup lacks the toggle anchor; such
/// an item is skipped by the controller.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct DropdownMarkup {
    pub id: DropdownId,
    pub toggle: Option<NavLink>,
    pub children: Vec<NavLink>,
}

impl DropdownMarkup {
    pub fn new(id: impl Into<DropdownId>, toggle: NavLink, children: Vec<NavLink>) -> Self {
        Self {
            id: id.into(),
            toggle: Some(toggle),
            children,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavEntry {
    Link(NavLink),
    Dropdown(DropdownMarkup),
}

/// Shape of the navigation region as supplied by the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct NavMarkup {
    pub has_burger: bool,
    pub has_menu: bool,
    pub entries: Vec<NavEntry>,
}

impl NavMarkup {
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self {
            has_burger: true,
            has_menu: true,
            entries,
        }
    }

    pub fn dropdowns(&self) -> impl Iterator<Item = &DropdownMarkup> {
        self.entries.iter().filter_map(|entry| match entry {
            NavEntry::Dropdown(dropdown) => Some(dropdown),
            NavEntry::Link(_) => None,
        })
    }

    pub fn plain_links(&self) -> impl Iterator<Item = &NavLink> {
        self.entries.iter().filter_map(|entry| match entry {
            NavEntry::Link(link) => Some(link),
            NavEntry::Dropdown(_) => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct PageModel {
    pub nav: NavMarkup,
    /// Source URLs of images wired to the lightbox.
    pub images: Vec<String>,
    pub has_modal: bool,
}

impl PageModel {
    pub fn new(nav: NavMarkup) -> Self {
        Self {
            nav,
            images: Vec::new(),
            has_modal: true,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Non-fatal problems found while binding controllers to a page.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("{0} not found in the page; controller disabled")]
    MissingElement(&'static str),

    #[error("dropdown {0} has no toggle link; skipped")]
    DropdownWithoutToggle(DropdownId),

    #[error("dropdown id {0} appears more than once; later copies skipped")]
    DuplicateDropdown(DropdownId),
}
