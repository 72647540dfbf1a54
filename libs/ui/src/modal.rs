use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::page::Diagnostic;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalState {
    pub visible: bool,
    /// Kept after `close()`; only read while visible.
    pub current_image: Option<String>,
}

/// Where a click inside the open overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    Backdrop,
    Image,
}

/// The single full-viewport image preview of a page.
#[derive(Debug, Clone)]
pub struct ImageModal {
    state: ModalState,
    available: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ImageModal {
    pub fn bind(has_container: bool) -> Self {
        let mut diagnostics = Vec::new();
        if !has_container {
            let diagnostic = Diagnostic::MissingElement("image modal container");
            warn!(%diagnostic, "image modal markup problem");
            diagnostics.push(diagnostic);
        }

        Self {
            state: ModalState::default(),
            available: has_container,
            diagnostics,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn open(&mut self, image_ref: impl Into<String>) {
        if !self.available {
            return;
        }
        self.state.visible = true;
        self.state.current_image = Some(image_ref.into());
    }

    pub fn close(&mut self) {
        self.state.visible = false;
    }

    pub fn on_overlay_click(&mut self, target: OverlayTarget) {
        if self.state.visible && target == OverlayTarget::Backdrop {
            self.close();
        }
    }

    pub fn on_key_escape(&mut self) {
        if self.state.visible {
            self.close();
        }
    }
}

impl Default for ImageModal {
    fn default() -> Self {
        Self::bind(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_hides_overlay() {
        let mut modal = ImageModal::default();
        modal.open("/img/pipeline.png");
        assert!(modal.is_visible());
        assert_eq!(
            modal.state().current_image.as_deref(),
            Some("/img/pipeline.png")
        );

        modal.close();
        assert!(!modal.is_visible());
    }

    #[test]
    fn backdrop_click_closes_but_image_click_does_not() {
        let mut modal = ImageModal::default();
        modal.open("/img/a.png");

        modal.on_overlay_click(OverlayTarget::Image);
        assert!(modal.is_visible());

        modal.on_overlay_click(OverlayTarget::Backdrop);
        assert!(!modal.is_visible());
    }

    #[test]
    fn escape_closes_only_when_visible() {
        let mut modal = ImageModal::default();
        modal.on_key_escape();
        assert_eq!(modal.state(), &ModalState::default());

        modal.open("/img/a.png");
        modal.on_key_escape();
        assert!(!modal.is_visible());
    }

    #[test]
    fn opening_while_open_replaces_the_image() {
        let mut modal = ImageModal::default();
        modal.open("/img/a.png");
        modal.open("/img/b.png");

        assert!(modal.is_visible());
        assert_eq!(modal.state().current_image.as_deref(), Some("/img/b.png"));
    }

    #[test]
    fn missing_container_makes_open_a_no_op() {
        let mut modal = ImageModal::bind(false);
        modal.open("/img/a.png");

        assert!(!modal.is_visible());
        assert_eq!(
            modal.diagnostics(),
            &[Diagnostic::MissingElement("image modal container")]
        );
    }
}
