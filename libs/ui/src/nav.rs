//! Mobile navigation menu and accordion dropdowns.
//!
//! On mobile viewports a dropdown parent is both a link and a disclosure. The
//! first activation opens its submenu and suppresses navigation; activating
//! the same toggle again while it is open lets the navigation through and
//! closes it. On desktop the controller leaves dropdowns to hover styling and
//! never touches link activation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    page::{Diagnostic, DropdownId, NavMarkup},
    viewport::{MOBILE_BREAKPOINT_PX, ViewportMode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavOptions {
    pub breakpoint_px: u32,
    /// Also collapse the whole mobile menu on a pointer interaction outside
    /// the navigation region. Open dropdowns are closed either way.
    pub outside_click_closes_menu: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            breakpoint_px: MOBILE_BREAKPOINT_PX,
            outside_click_closes_menu: false,
        }
    }
}

/// Invariant: `open_dropdown` is `None` whenever `menu_open` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub menu_open: bool,
    pub open_dropdown: Option<DropdownId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapStage {
    Closed,
    FirstTap,
}

/// What the host should do with the activation's default behavior.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Allow,
    Prevent,
}

impl DefaultAction {
    pub fn is_prevented(self) -> bool {
        matches!(self, DefaultAction::Prevent)
    }
}

/// The enclosing item of an activated in-menu link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Plain,
    DropdownToggle(DropdownId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSignal {
    OutsidePointer,
    Escape,
}

#[derive(Debug, Clone)]
pub struct NavController {
    options: NavOptions,
    mode: ViewportMode,
    state: NavState,
    dropdowns: Vec<DropdownId>,
    enabled: bool,
    diagnostics: Vec<Diagnostic>,
}

impl NavController {
    pub fn bind(markup: &NavMarkup, viewport_width: u32, options: NavOptions) -> Self {
        let mut diagnostics = Vec::new();

        if !markup.has_burger {
            diagnostics.push(Diagnostic::MissingElement("hamburger control"));
        }
        if !markup.has_menu {
            diagnostics.push(Diagnostic::MissingElement("navigation list"));
        }
        let enabled = diagnostics.is_empty();

        let mut seen = HashSet::new();
        let mut dropdowns = Vec::new();
        for dropdown in markup.dropdowns() {
            if dropdown.toggle.is_none() {
                diagnostics.push(Diagnostic::DropdownWithoutToggle(dropdown.id.clone()));
                continue;
            }
            if !seen.insert(dropdown.id.clone()) {
                diagnostics.push(Diagnostic::DuplicateDropdown(dropdown.id.clone()));
                continue;
            }
            dropdowns.push(dropdown.id.clone());
        }

        for diagnostic in &diagnostics {
            warn!(%diagnostic, "navigation markup problem");
        }

        Self {
            options,
            mode: ViewportMode::with_breakpoint(viewport_width, options.breakpoint_px),
            state: NavState::default(),
            dropdowns,
            enabled,
            diagnostics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn options(&self) -> NavOptions {
        self.options
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Dropdowns the controller manages, in markup order.
    pub fn dropdown_ids(&self) -> &[DropdownId] {
        &self.dropdowns
    }

    pub fn manages(&self, id: &DropdownId) -> bool {
        self.dropdowns.contains(id)
    }

    pub fn tap_stage(&self, id: &DropdownId) -> TapStage {
        if self.state.open_dropdown.as_ref() == Some(id) {
            TapStage::FirstTap
        } else {
            TapStage::Closed
        }
    }

    pub fn toggle_menu(&mut self) {
        if !self.enabled {
            return;
        }

        self.state.menu_open = !self.state.menu_open;
        self.state.open_dropdown = None;
    }

    pub fn close_menu_if_plain_link(&mut self, link: &LinkTarget) {
        if !self.enabled || !self.mode.is_mobile() {
            return;
        }

        if matches!(link, LinkTarget::Plain) {
            self.close_menu();
        }
    }

    /// A toggle activated while the mobile menu is collapsed behaves as a
    /// plain link and leaves dropdown state untouched.
    pub fn on_dropdown_toggle_activate(&mut self, id: &DropdownId) -> DefaultAction {
        if !self.enabled || !self.mode.is_mobile() || !self.manages(id) || !self.state.menu_open
        {
            return DefaultAction::Allow;
        }

        match self.tap_stage(id) {
            TapStage::Closed => {
                // Replaces any other open dropdown in the same transition.
                self.state.open_dropdown = Some(id.clone());
                DefaultAction::Prevent
            }
            TapStage::FirstTap => {
                self.state.open_dropdown = None;
                DefaultAction::Allow
            }
        }
    }

    pub fn on_dismiss(&mut self, signal: DismissSignal) {
        if !self.enabled {
            return;
        }

        match signal {
            DismissSignal::OutsidePointer => {
                if !self.mode.is_mobile() || !self.state.menu_open {
                    return;
                }
                if self.options.outside_click_closes_menu {
                    self.close_menu();
                } else {
                    self.state.open_dropdown = None;
                }
            }
            DismissSignal::Escape => {
                self.state.open_dropdown = None;
            }
        }
    }

    /// Returns `true` when the viewport changed between mobile and desktop.
    pub fn on_resize(&mut self, viewport_width: u32) -> bool {
        let mode = ViewportMode::with_breakpoint(viewport_width, self.options.breakpoint_px);
        if mode == self.mode {
            return false;
        }

        self.mode = mode;
        if !mode.is_mobile() {
            self.close_menu();
        }
        true
    }

    fn close_menu(&mut self) {
        self.state.menu_open = false;
        self.state.open_dropdown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{DropdownMarkup, NavEntry, NavLink};

    fn markup() -> NavMarkup {
        NavMarkup::new(vec![
            NavEntry::Link(NavLink::new("Home", "/")),
            NavEntry::Dropdown(DropdownMarkup::new(
                "services",
                NavLink::new("Services", "/services"),
                vec![NavLink::new("Consulting", "/services/consulting")],
            )),
            NavEntry::Dropdown(DropdownMarkup::new(
                "experience",
                NavLink::new("Experience", "/about"),
                vec![NavLink::new("UKHSA", "/roles/ukhsa")],
            )),
        ])
    }

    fn mobile() -> NavController {
        let mut nav = NavController::bind(&markup(), 500, NavOptions::default());
        nav.toggle_menu();
        nav
    }

    #[test]
    fn toggle_menu_flips_open_state() {
        let mut nav = NavController::bind(&markup(), 500, NavOptions::default());
        assert!(!nav.state().menu_open);

        nav.toggle_menu();
        assert!(nav.state().menu_open);

        nav.toggle_menu();
        assert!(!nav.state().menu_open);
    }

    #[test]
    fn closing_menu_closes_open_dropdown() {
        let mut nav = mobile();
        let services = DropdownId::from("services");
        assert_eq!(
            nav.on_dropdown_toggle_activate(&services),
            DefaultAction::Prevent
        );

        nav.toggle_menu();
        assert_eq!(nav.state(), &NavState::default());
        assert_eq!(nav.tap_stage(&services), TapStage::Closed);
    }

    #[test]
    fn toggle_with_collapsed_menu_opens_nothing() {
        let mut nav = NavController::bind(&markup(), 500, NavOptions::default());
        let services = DropdownId::from("services");

        assert_eq!(
            nav.on_dropdown_toggle_activate(&services),
            DefaultAction::Allow
        );
        assert_eq!(nav.state().open_dropdown, None);

        nav.toggle_menu();
        assert!(nav.state().menu_open);
        assert_eq!(nav.tap_stage(&services), TapStage::Closed);
    }

    #[test]
    fn reopening_menu_starts_with_every_dropdown_closed() {
        let mut nav = mobile();
        let _ = nav.on_dropdown_toggle_activate(&"services".into());

        nav.toggle_menu();
        nav.toggle_menu();
        assert!(nav.state().menu_open);
        assert_eq!(nav.state().open_dropdown, None);
    }

    #[test]
    fn second_tap_on_same_dropdown_allows_navigation() {
        let mut nav = mobile();
        let services = DropdownId::from("services");

        let first = nav.on_dropdown_toggle_activate(&services);
        assert!(first.is_prevented());
        assert_eq!(nav.state().open_dropdown, Some(services.clone()));
        assert!(nav.state().menu_open);

        let second = nav.on_dropdown_toggle_activate(&services);
        assert_eq!(second, DefaultAction::Allow);
        assert_eq!(nav.state().open_dropdown, None);
    }

    #[test]
    fn opening_another_dropdown_replaces_the_open_one() {
        let mut nav = mobile();
        let services = DropdownId::from("services");
        let experience = DropdownId::from("experience");

        let _ = nav.on_dropdown_toggle_activate(&services);
        let action = nav.on_dropdown_toggle_activate(&experience);

        assert!(action.is_prevented());
        assert_eq!(nav.state().open_dropdown, Some(experience.clone()));
        assert_eq!(nav.tap_stage(&services), TapStage::Closed);
        assert_eq!(nav.tap_stage(&experience), TapStage::FirstTap);
    }

    #[test]
    fn tap_after_switching_back_is_a_first_tap_again() {
        let mut nav = mobile();
        let services = DropdownId::from("services");
        let experience = DropdownId::from("experience");

        let _ = nav.on_dropdown_toggle_activate(&services);
        let _ = nav.on_dropdown_toggle_activate(&experience);

        assert!(nav.on_dropdown_toggle_activate(&services).is_prevented());
    }

    #[test]
    fn desktop_never_suppresses_or_opens() {
        let mut nav = NavController::bind(&markup(), 1200, NavOptions::default());
        let services = DropdownId::from("services");

        for _ in 0..3 {
            assert_eq!(
                nav.on_dropdown_toggle_activate(&services),
                DefaultAction::Allow
            );
            assert_eq!(nav.state().open_dropdown, None);
        }
    }

    #[test]
    fn plain_link_closes_menu_on_mobile_only() {
        let mut nav = mobile();
        nav.close_menu_if_plain_link(&LinkTarget::DropdownToggle("services".into()));
        assert!(nav.state().menu_open);

        nav.close_menu_if_plain_link(&LinkTarget::Plain);
        assert!(!nav.state().menu_open);

        let mut desktop = NavController::bind(&markup(), 1024, NavOptions::default());
        desktop.toggle_menu();
        desktop.close_menu_if_plain_link(&LinkTarget::Plain);
        assert!(desktop.state().menu_open);
    }

    #[test]
    fn outside_pointer_closes_dropdowns_but_keeps_menu() {
        let mut nav = mobile();
        let _ = nav.on_dropdown_toggle_activate(&"services".into());

        nav.on_dismiss(DismissSignal::OutsidePointer);
        assert!(nav.state().menu_open);
        assert_eq!(nav.state().open_dropdown, None);
    }

    #[test]
    fn outside_pointer_closes_menu_when_hardened() {
        let options = NavOptions {
            outside_click_closes_menu: true,
            ..NavOptions::default()
        };
        let mut nav = NavController::bind(&markup(), 400, options);
        nav.toggle_menu();
        let _ = nav.on_dropdown_toggle_activate(&"services".into());

        nav.on_dismiss(DismissSignal::OutsidePointer);
        assert_eq!(nav.state(), &NavState::default());
    }

    #[test]
    fn outside_pointer_with_closed_menu_is_ignored() {
        let mut nav = NavController::bind(&markup(), 500, NavOptions::default());
        nav.on_dismiss(DismissSignal::OutsidePointer);
        assert_eq!(nav.state(), &NavState::default());
    }

    #[test]
    fn escape_closes_dropdowns() {
        let mut nav = mobile();
        let _ = nav.on_dropdown_toggle_activate(&"experience".into());

        nav.on_dismiss(DismissSignal::Escape);
        assert_eq!(nav.state().open_dropdown, None);
        assert!(nav.state().menu_open);
    }

    #[test]
    fn resize_to_desktop_clears_state_and_disables_taps() {
        let mut nav = mobile();
        let services = DropdownId::from("services");
        let _ = nav.on_dropdown_toggle_activate(&services);

        assert!(nav.on_resize(1200));
        assert_eq!(nav.state(), &NavState::default());
        assert_eq!(
            nav.on_dropdown_toggle_activate(&services),
            DefaultAction::Allow
        );

        assert!(nav.on_resize(768));
        nav.toggle_menu();
        assert!(nav.on_dropdown_toggle_activate(&services).is_prevented());
    }

    #[test]
    fn resize_within_same_mode_keeps_state() {
        let mut nav = mobile();
        let _ = nav.on_dropdown_toggle_activate(&"services".into());

        assert!(!nav.on_resize(600));
        assert_eq!(nav.state().open_dropdown, Some("services".into()));
    }

    #[test]
    fn missing_burger_disables_controller() {
        let mut markup = markup();
        markup.has_burger = false;

        let mut nav = NavController::bind(&markup, 500, NavOptions::default());
        assert!(!nav.is_enabled());
        assert_eq!(
            nav.diagnostics(),
            &[Diagnostic::MissingElement("hamburger control")]
        );

        nav.toggle_menu();
        assert!(!nav.state().menu_open);
        assert_eq!(
            nav.on_dropdown_toggle_activate(&"services".into()),
            DefaultAction::Allow
        );
    }

    #[test]
    fn dropdown_without_toggle_is_skipped() {
        let mut markup = markup();
        markup.entries.push(NavEntry::Dropdown(DropdownMarkup {
            id: "broken".into(),
            toggle: None,
            children: vec![NavLink::new("Orphan", "/orphan")],
        }));

        let mut nav = NavController::bind(&markup, 500, NavOptions::default());
        nav.toggle_menu();
        assert!(nav.is_enabled());
        assert_eq!(
            nav.dropdown_ids(),
            &[DropdownId::from("services"), DropdownId::from("experience")]
        );
        assert_eq!(
            nav.on_dropdown_toggle_activate(&"broken".into()),
            DefaultAction::Allow
        );
        assert!(nav.on_dropdown_toggle_activate(&"services".into()).is_prevented());
    }

    #[test]
    fn duplicate_dropdown_ids_are_reported() {
        let mut markup = markup();
        markup.entries.push(NavEntry::Dropdown(DropdownMarkup::new(
            "services",
            NavLink::new("Services again", "/services"),
            Vec::new(),
        )));

        let nav = NavController::bind(&markup, 500, NavOptions::default());
        assert_eq!(nav.dropdown_ids().len(), 2);
        assert_eq!(
            nav.diagnostics(),
            &[Diagnostic::DuplicateDropdown("services".into())]
        );
    }

    #[test]
    fn at_most_one_dropdown_is_open_across_any_tap_sequence() {
        let mut nav = mobile();
        let ids = [
            DropdownId::from("services"),
            DropdownId::from("experience"),
        ];
        let sequence = [0, 1, 1, 0, 0, 1, 0, 1, 1, 1, 0];

        for index in sequence {
            let _ = nav.on_dropdown_toggle_activate(&ids[index]);
            let open = ids
                .iter()
                .filter(|id| nav.tap_stage(id) == TapStage::FirstTap)
                .count();
            assert!(open <= 1);
        }
    }
}
