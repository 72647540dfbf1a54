//! Server-side markup for the navigation region and the image modal.
//!
//! The markup is the projection of a controller view, so pages rendered from
//! a freshly bound controller match what the controllers expect on load.
//! Element identities are carried in `data-*` attributes for delegation.

use std::fmt::Write as _;

use crate::{
    page::{NavEntry, NavLink, NavMarkup},
    view::{ModalDisplay, ModalView, NavView},
};

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn class_attr(classes: &[&str]) -> String {
    let classes: Vec<&str> = classes.iter().copied().filter(|c| !c.is_empty()).collect();
    if classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", classes.join(" "))
    }
}

fn link_html(link: &NavLink, current: Option<&str>, extra_class: &str) -> String {
    let current_class = if current == Some(link.href.as_str()) {
        "current"
    } else {
        ""
    };
    format!(
        "<a href=\"{}\"{}>{}</a>",
        escape_html(&link.href),
        class_attr(&[extra_class, current_class]),
        escape_html(&link.label)
    )
}

pub fn render_nav_html(markup: &NavMarkup, view: &NavView, current: Option<&str>) -> String {
    let mut html = String::from("<nav data-nav>");

    if markup.has_burger {
        let _ = write!(
            html,
            "<button id=\"burger\" class=\"burger\" type=\"button\" aria-controls=\"nav-menu\" aria-expanded=\"{}\">{}</button>",
            view.menu_active, view.burger_glyph
        );
    }

    if markup.has_menu {
        let menu_class = if view.menu_active { "active" } else { "" };
        let _ = write!(html, "<ul id=\"nav-menu\"{}>", class_attr(&[menu_class]));

        for entry in &markup.entries {
            match entry {
                NavEntry::Link(link) => {
                    let _ = write!(html, "<li>{}</li>", link_html(link, current, ""));
                }
                NavEntry::Dropdown(dropdown) => {
                    let active = if view.dropdown_active(&dropdown.id) {
                        "active"
                    } else {
                        ""
                    };
                    let _ = write!(
                        html,
                        "<li{} data-dropdown=\"{}\">",
                        class_attr(&["dropdown", active]),
                        escape_html(&dropdown.id.0)
                    );
                    if let Some(toggle) = &dropdown.toggle {
                        html.push_str(&link_html(toggle, current, "dropdown-toggle"));
                    }
                    html.push_str("<ul class=\"dropdown-menu\">");
                    for child in &dropdown.children {
                        let _ = write!(html, "<li>{}</li>", link_html(child, current, ""));
                    }
                    html.push_str("</ul></li>");
                }
            }
        }

        html.push_str("</ul>");
    }

    html.push_str("</nav>");
    html
}

pub fn render_modal_html(view: &ModalView) -> String {
    let src = match (&view.display, &view.src) {
        (ModalDisplay::Block, Some(src)) => format!(" src=\"{}\"", escape_html(src)),
        _ => String::new(),
    };
    format!(
        "<div id=\"imageModal\" class=\"modal\" data-modal-backdrop style=\"display:{}\"><img id=\"modalImage\" class=\"modal-content\" alt=\"\"{}></div>",
        view.display.as_css(),
        src
    )
}

/// An image that opens the lightbox with its own source.
pub fn render_lightbox_image(src: &str, alt: &str) -> String {
    let src = escape_html(src);
    format!(
        "<img src=\"{src}\" alt=\"{}\" class=\"lightbox\" data-modal-src=\"{src}\" loading=\"lazy\">",
        escape_html(alt)
    )
}
