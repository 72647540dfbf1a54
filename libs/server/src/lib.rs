//! HTTP surface of the portfolio site: page rendering, the contact pipeline,
//! static assets and the runtime that serves them.

pub mod assets;
pub mod config;
pub mod contact;
pub mod error;
pub mod mailer;
pub mod pages;
pub mod routes;
pub mod runtime;
pub mod site;
pub mod state;

pub use config::{FolioCliFlags, FolioConfig, MailSettings};
pub use error::{ContactError, FieldError, MailError};
pub use mailer::{HttpMailer, LogMailer, Mailer, OutgoingMail};
pub use routes::router;
pub use runtime::{build_mailer, build_state, serve};
pub use state::AppState;
