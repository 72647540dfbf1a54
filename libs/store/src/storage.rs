//! Storage abstraction used by the HTTP layer.

use async_trait::async_trait;

use crate::{
    error::StoreError,
    models::{
        Certificate, ContactMessage, NewCertificate, NewContactMessage, NewProject, Project,
        RelayStatus,
    },
};

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    // =========================================================================
    // Projects
    // =========================================================================

    /// Newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;

    async fn create_project(&self, project: &NewProject) -> Result<Project, StoreError>;

    async fn delete_project(&self, project_id: i64) -> Result<(), StoreError>;

    // =========================================================================
    // Certificates
    // =========================================================================

    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError>;

    async fn create_certificate(
        &self,
        certificate: &NewCertificate,
    ) -> Result<Certificate, StoreError>;

    // =========================================================================
    // Contact messages
    // =========================================================================

    /// Persists a submission with [`RelayStatus::Pending`].
    async fn insert_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, StoreError>;

    async fn mark_contact_relay(
        &self,
        message_id: i64,
        status: RelayStatus,
    ) -> Result<(), StoreError>;

    /// Newest first, at most `limit` rows.
    async fn list_contacts(&self, limit: u32) -> Result<Vec<ContactMessage>, StoreError>;
}
