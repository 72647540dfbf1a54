//! Relational storage for the portfolio site.
//!
//! [`PortfolioStore`] is the seam the server depends on; [`LocalStore`] is the
//! libsql implementation, backed by a file or by `:memory:` in tests.

pub mod error;
pub mod local;
pub mod migrations;
pub mod models;
pub mod storage;


pub use error::StoreError;
pub use local::LocalStore;
pub use models::{
    Certificate, ContactMessage, NewCertificate, NewContactMessage, NewProject, Project,
    RelayStatus,
};
pub use storage::PortfolioStore;
