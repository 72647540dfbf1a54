//! Server-rendered pages. Every page shares [`layout`], which renders the
//! closed projection of the navigation and image modal controllers.

use std::fmt::Write as _;

use folio_store::{Certificate, Project};
use folio_ui::{
    ImageModal, NavController, NavOptions,
    render::{escape_html, render_lightbox_image, render_modal_html, render_nav_html},
};

use crate::site::{self, ROLES, Role, Section};

const SKILLS: &[(&str, &[&str])] = &[
    ("Languages", &["Rust", "TypeScript", "JavaScript", "Python", "SQL"]),
    ("Web", &["Node.js", "Express", "HTML", "CSS", "REST APIs"]),
    ("Data", &["MySQL", "PostgreSQL", "SQLite"]),
    ("Cloud & tooling", &["AWS", "Docker", "Git", "CI/CD"]),
];

pub fn layout(section: Section, nav_options: NavOptions, body: &str) -> String {
    let markup = site::site_nav();
    // On load nothing is open, so the projection is mode independent.
    let nav = NavController::bind(&markup, nav_options.breakpoint_px, nav_options);
    let modal = ImageModal::default();
    let current = section.current_href();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{} | Portfolio</title>\n<link rel=\"stylesheet\" href=\"/static/css/style.css\">\n</head>\n<body data-breakpoint=\"{}\">\n<header>{}</header>\n<main>\n{}\n</main>\n{}\n<script src=\"/static/js/script.js\" defer></script>\n</body>\n</html>\n",
        escape_html(&section.title()),
        nav_options.breakpoint_px,
        render_nav_html(&markup, &nav.view(), Some(&current)),
        body,
        render_modal_html(&modal.view()),
    )
}

fn project_card(project: &Project) -> String {
    let mut html = String::from("<article class=\"project-card\">");
    if let Some(image) = &project.image_url {
        html.push_str(&render_lightbox_image(image, &project.title));
    }
    let _ = write!(
        html,
        "<h3>{}</h3><p>{}</p>",
        escape_html(&project.title),
        escape_html(&project.description)
    );
    if !project.tags.is_empty() {
        html.push_str("<ul class=\"tags\">");
        for tag in &project.tags {
            let _ = write!(html, "<li>{}</li>", escape_html(tag));
        }
        html.push_str("</ul>");
    }
    if let Some(link) = &project.link_url {
        let _ = write!(
            html,
            "<a class=\"project-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">View project</a>",
            escape_html(link)
        );
    }
    html.push_str("</article>");
    html
}

fn project_grid(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "<p class=\"empty\">No projects yet.</p>".to_string();
    }
    let cards: String = projects.iter().map(project_card).collect();
    format!("<div class=\"project-grid\">{cards}</div>")
}

pub fn home_page(projects: &[Project], nav_options: NavOptions) -> String {
    let featured: Vec<Project> = projects.iter().take(3).cloned().collect();
    let body = format!(
        "<section class=\"hero\"><h1>Software engineer</h1><p>I build reliable web services and the tooling around them.</p><a class=\"button\" href=\"/contact\">Get in touch</a></section>\n<section id=\"featured\"><h2>Featured projects</h2>{}<a href=\"/projects\">All projects</a></section>",
        project_grid(&featured)
    );
    layout(Section::Home, nav_options, &body)
}

pub fn projects_page(projects: &[Project], nav_options: NavOptions) -> String {
    let body = format!(
        "<section id=\"projects\"><h1>Projects</h1>{}</section>",
        project_grid(projects)
    );
    layout(Section::Projects, nav_options, &body)
}

pub fn skills_page(nav_options: NavOptions) -> String {
    let mut body = String::from("<section id=\"skills\"><h1>Skills</h1>");
    for (group, skills) in SKILLS {
        let _ = write!(body, "<div class=\"skill-group\"><h2>{}</h2><ul>", escape_html(group));
        for skill in *skills {
            let _ = write!(body, "<li>{}</li>", escape_html(skill));
        }
        body.push_str("</ul></div>");
    }
    body.push_str("</section>");
    layout(Section::Skills, nav_options, &body)
}

pub fn about_page(nav_options: NavOptions) -> String {
    let mut body = String::from(
        "<section id=\"about\"><h1>About</h1><p>Engineer with experience across public sector, finance and healthcare organisations.</p><h2>Experience</h2><ul class=\"roles\">",
    );
    for role in ROLES {
        let _ = write!(
            body,
            "<li><a href=\"{}\">{}</a> {}</li>",
            escape_html(&role.href()),
            escape_html(role.organisation),
            escape_html(role.summary)
        );
    }
    body.push_str("</ul></section>");
    layout(Section::About, nav_options, &body)
}

pub fn role_page(role: &'static Role, nav_options: NavOptions) -> String {
    let mut body = format!(
        "<section class=\"role\" id=\"{}\"><h1>{}</h1><p>{}</p><ul>",
        escape_html(role.slug),
        escape_html(role.organisation),
        escape_html(role.summary)
    );
    for highlight in role.highlights {
        let _ = write!(body, "<li>{}</li>", escape_html(highlight));
    }
    body.push_str("</ul><a href=\"/about\">Back to experience</a></section>");
    layout(Section::Role(role), nav_options, &body)
}

pub fn certificates_page(certificates: &[Certificate], nav_options: NavOptions) -> String {
    let mut body = String::from("<section id=\"certificates\"><h1>Certificates</h1>");
    if certificates.is_empty() {
        body.push_str("<p class=\"empty\">No certificates yet.</p>");
    } else {
        body.push_str("<div class=\"certificate-grid\">");
        for certificate in certificates {
            body.push_str("<article class=\"certificate\">");
            if let Some(image) = &certificate.image_url {
                body.push_str(&render_lightbox_image(image, &certificate.title));
            }
            let _ = write!(
                body,
                "<h3>{}</h3><p class=\"issuer\">{}</p>",
                escape_html(&certificate.title),
                escape_html(&certificate.issuer)
            );
            if let Some(issued_on) = &certificate.issued_on {
                let _ = write!(body, "<p class=\"issued\">{}</p>", escape_html(issued_on));
            }
            if let Some(url) = &certificate.credential_url {
                let _ = write!(
                    body,
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Verify credential</a>",
                    escape_html(url)
                );
            }
            body.push_str("</article>");
        }
        body.push_str("</div>");
    }
    body.push_str("</section>");
    layout(Section::Certificates, nav_options, &body)
}

pub fn contact_page(nav_options: NavOptions) -> String {
    let body = "<section id=\"contact\"><h1>Contact</h1><form id=\"contact-form\" method=\"post\" action=\"/contact\"><label for=\"name\">Name</label><input id=\"name\" name=\"name\" type=\"text\" required><label for=\"email\">Email</label><input id=\"email\" name=\"email\" type=\"email\" required><label for=\"message\">Message</label><textarea id=\"message\" name=\"message\" rows=\"6\" required></textarea><button type=\"submit\">Send</button><p id=\"form-status\" role=\"status\"></p></form></section>";
    layout(Section::Contact, nav_options, body)
}
