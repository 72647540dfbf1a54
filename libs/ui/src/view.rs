use serde::Serialize;

use crate::{
    modal::ImageModal,
    nav::NavController,
    page::DropdownId,
    viewport::ViewportMode,
};

pub const MENU_GLYPH: &str = "☰";
pub const CLOSE_GLYPH: &str = "✕";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownView {
    pub id: DropdownId,
    pub active: bool,
}

/// Class and glyph state of the navigation region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavView {
    pub mode: ViewportMode,
    pub menu_active: bool,
    pub burger_glyph: &'static str,
    pub dropdowns: Vec<DropdownView>,
}

impl NavView {
    pub fn dropdown_active(&self, id: &DropdownId) -> bool {
        self.dropdowns
            .iter()
            .any(|dropdown| &dropdown.id == id && dropdown.active)
    }

    pub fn any_active(&self) -> bool {
        self.menu_active || self.dropdowns.iter().any(|dropdown| dropdown.active)
    }
}

impl NavController {
    pub fn view(&self) -> NavView {
        let state = self.state();
        // Desktop styling owns the dropdowns; never project a stale class.
        let mobile = self.mode().is_mobile();

        NavView {
            mode: self.mode(),
            menu_active: state.menu_open,
            burger_glyph: if state.menu_open {
                CLOSE_GLYPH
            } else {
                MENU_GLYPH
            },
            dropdowns: self
                .dropdown_ids()
                .iter()
                .map(|id| DropdownView {
                    id: id.clone(),
                    active: mobile && state.open_dropdown.as_ref() == Some(id),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalDisplay {
    Block,
    None,
}

impl ModalDisplay {
    pub fn as_css(self) -> &'static str {
        match self {
            ModalDisplay::Block => "block",
            ModalDisplay::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub display: ModalDisplay,
    pub src: Option<String>,
}

impl ImageModal {
    pub fn view(&self) -> ModalView {
        let state = self.state();
        if state.visible {
            ModalView {
                display: ModalDisplay::Block,
                src: state.current_image.clone(),
            }
        } else {
            ModalView {
                display: ModalDisplay::None,
                src: None,
            }
        }
    }
}
