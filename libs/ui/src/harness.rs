//! In-memory page that binds both controllers to a [`PageModel`].
//!
//! Listeners are registered once, keyed on element identity, when the page
//! loads. Resizes only rebuild controller state, so the listener table never
//! grows after [`VirtualPage::load`].

use tracing::debug;

use crate::{
    modal::{ImageModal, OverlayTarget},
    nav::{DefaultAction, DismissSignal, LinkTarget, NavController, NavOptions},
    page::{Diagnostic, DropdownId, PageModel},
    view::{ModalView, NavView},
};

/// Element a click lands on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Burger,
    /// Top-level plain link, by href.
    NavLink(String),
    DropdownToggle(DropdownId),
    DropdownChild { dropdown: DropdownId, href: String },
    /// Lightbox-enabled image, by source URL.
    Image(String),
    ModalBackdrop,
    ModalImage,
    /// Anything else on the page.
    Outside,
}

impl Target {
    fn in_nav_region(&self) -> bool {
        matches!(
            self,
            Target::Burger
                | Target::NavLink(_)
                | Target::DropdownToggle(_)
                | Target::DropdownChild { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click(Target),
    KeyDown(Key),
    Resize(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Listener {
    BurgerClick,
    LinkClick(String),
    ToggleClick(DropdownId),
    ImageClick(String),
    OverlayClick,
    DocumentClick,
    DocumentKeydown,
    WindowResize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub navigated_to: Option<String>,
}

pub struct VirtualPage {
    model: PageModel,
    nav: NavController,
    modal: ImageModal,
    listeners: Vec<Listener>,
    viewport_width: u32,
    navigations: Vec<String>,
}

impl VirtualPage {
    pub fn load(model: PageModel, viewport_width: u32, options: NavOptions) -> Self {
        let nav = NavController::bind(&model.nav, viewport_width, options);
        let modal = ImageModal::bind(model.has_modal);
        let listeners = bind_listeners(&model, &nav, &modal);

        debug!(
            listeners = listeners.len(),
            viewport_width, "virtual page loaded"
        );

        Self {
            model,
            nav,
            modal,
            listeners,
            viewport_width,
            navigations: Vec::new(),
        }
    }

    pub fn nav(&self) -> &NavController {
        &self.nav
    }

    pub fn modal(&self) -> &ImageModal {
        &self.modal
    }

    pub fn nav_view(&self) -> NavView {
        self.nav.view()
    }

    pub fn modal_view(&self) -> ModalView {
        self.modal.view()
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.nav
            .diagnostics()
            .iter()
            .chain(self.modal.diagnostics())
            .cloned()
            .collect()
    }

    pub fn listener_count(&self, listener: &Listener) -> usize {
        self.listeners.iter().filter(|bound| *bound == listener).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn click(&mut self, target: Target) -> DispatchOutcome {
        self.dispatch(PageEvent::Click(target))
    }

    pub fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        match event {
            PageEvent::Click(target) => self.dispatch_click(target),
            PageEvent::KeyDown(key) => {
                for listener in &self.listeners {
                    if *listener == Listener::DocumentKeydown && key == Key::Escape {
                        self.nav.on_dismiss(DismissSignal::Escape);
                        self.modal.on_key_escape();
                    }
                }
                DispatchOutcome::default()
            }
            PageEvent::Resize(width) => {
                self.viewport_width = width;
                for listener in &self.listeners {
                    if *listener == Listener::WindowResize {
                        self.nav.on_resize(width);
                    }
                }
                DispatchOutcome::default()
            }
        }
    }

    fn dispatch_click(&mut self, target: Target) -> DispatchOutcome {
        let Some(href) = self.resolve(&target) else {
            debug!(?target, "click on an element missing from the page");
            return DispatchOutcome::default();
        };

        let mut action = DefaultAction::Allow;
        for listener in &self.listeners {
            match (listener, &target) {
                (Listener::BurgerClick, Target::Burger) => self.nav.toggle_menu(),
                (Listener::LinkClick(bound), Target::NavLink(clicked))
                | (Listener::LinkClick(bound), Target::DropdownChild { href: clicked, .. })
                    if bound == clicked =>
                {
                    self.nav.close_menu_if_plain_link(&LinkTarget::Plain);
                }
                (Listener::ToggleClick(bound), Target::DropdownToggle(clicked))
                    if bound == clicked =>
                {
                    self.nav
                        .close_menu_if_plain_link(&LinkTarget::DropdownToggle(clicked.clone()));
                    if self.nav.on_dropdown_toggle_activate(clicked).is_prevented() {
                        action = DefaultAction::Prevent;
                    }
                }
                (Listener::ImageClick(bound), Target::Image(clicked)) if bound == clicked => {
                    self.modal.open(clicked.clone());
                }
                (Listener::OverlayClick, Target::ModalBackdrop) => {
                    self.modal.on_overlay_click(OverlayTarget::Backdrop);
                }
                (Listener::OverlayClick, Target::ModalImage) => {
                    self.modal.on_overlay_click(OverlayTarget::Image);
                }
                (Listener::DocumentClick, target) if !target.in_nav_region() => {
                    self.nav.on_dismiss(DismissSignal::OutsidePointer);
                }
                _ => {}
            }
        }

        let default_prevented = action.is_prevented();
        let navigated_to = match href {
            Some(href) if !default_prevented => {
                self.navigations.push(href.clone());
                Some(href)
            }
            _ => None,
        };

        DispatchOutcome {
            default_prevented,
            navigated_to,
        }
    }

    /// `None` when the element is absent; `Some(href)` carries the link
    /// destination for anchors.
    fn resolve(&self, target: &Target) -> Option<Option<String>> {
        let nav = &self.model.nav;
        match target {
            Target::Burger => nav.has_burger.then_some(None),
            Target::NavLink(href) => nav
                .plain_links()
                .any(|link| &link.href == href)
                .then(|| Some(href.clone())),
            Target::DropdownToggle(id) => nav
                .dropdowns()
                .find(|dropdown| &dropdown.id == id)
                .and_then(|dropdown| dropdown.toggle.as_ref())
                .map(|toggle| Some(toggle.href.clone())),
            Target::DropdownChild { dropdown, href } => nav
                .dropdowns()
                .filter(|candidate| &candidate.id == dropdown)
                .flat_map(|candidate| candidate.children.iter())
                .any(|child| &child.href == href)
                .then(|| Some(href.clone())),
            Target::Image(src) => self.model.images.contains(src).then_some(None),
            Target::ModalBackdrop | Target::ModalImage => self.model.has_modal.then_some(None),
            Target::Outside => Some(None),
        }
    }
}

fn bind_listeners(model: &PageModel, nav: &NavController, modal: &ImageModal) -> Vec<Listener> {
    let mut listeners = Vec::new();

    if nav.is_enabled() {
        listeners.push(Listener::BurgerClick);
        listeners.extend(
            model
                .nav
                .plain_links()
                .map(|link| Listener::LinkClick(link.href.clone())),
        );
        for dropdown in model.nav.dropdowns() {
            if !nav.manages(&dropdown.id) {
                continue;
            }
            listeners.push(Listener::ToggleClick(dropdown.id.clone()));
            listeners.extend(
                dropdown
                    .children
                    .iter()
                    .map(|child| Listener::LinkClick(child.href.clone())),
            );
        }
        listeners.push(Listener::WindowResize);
    }

    if modal.is_available() {
        listeners.extend(
            model
                .images
                .iter()
                .map(|src| Listener::ImageClick(src.clone())),
        );
        listeners.push(Listener::OverlayClick);
    }

    listeners.push(Listener::DocumentClick);
    listeners.push(Listener::DocumentKeydown);

    // One listener per element identity, however often it appears in markup.
    let mut unique = Vec::with_capacity(listeners.len());
    for listener in listeners {
        if !unique.contains(&listener) {
            unique.push(listener);
        }
    }
    unique
}
