//! Client-side interaction state for the portfolio pages.
//!
//! The navigation menu, its dropdown submenus and the image lightbox are
//! modelled as explicit state machines. Hosts feed them interpreted events and
//! render [`view::NavView`] / [`view::ModalView`], which are pure projections
//! of the controller state. [`harness::VirtualPage`] wires both controllers to
//! a [`page::PageModel`] the same way a browser binding would.

pub mod harness;
pub mod modal;
pub mod nav;
pub mod page;
pub mod render;
pub mod view;
pub mod viewport;

pub use harness::{DispatchOutcome, Key, Listener, PageEvent, Target, VirtualPage};
pub use modal::{ImageModal, ModalState, OverlayTarget};
pub use nav::{
    DefaultAction, DismissSignal, LinkTarget, NavController, NavOptions, NavState, TapStage,
};
pub use page::{Diagnostic, DropdownId, DropdownMarkup, NavEntry, NavLink, NavMarkup, PageModel};
pub use view::{DropdownView, ModalDisplay, ModalView, NavView};
pub use viewport::{MOBILE_BREAKPOINT_PX, ViewportMode};
