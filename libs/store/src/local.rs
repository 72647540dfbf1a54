//! Local libsql storage implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Row, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::StoreError,
    migrations::{self, MigrationStatus},
    models::{
        Certificate, ContactMessage, NewCertificate, NewContactMessage, NewProject, Project,
        RelayStatus,
    },
    storage::PortfolioStore,
};

/// The libsql connection is not `Sync`, so access goes through a mutex.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Opens (creating if needed) the database at `db_path` and applies
    /// pending migrations. `":memory:"` gives a private in-memory database.
    pub async fn open(db_path: &str) -> Result<Self, StoreError> {
        let store = Self::connect(db_path).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Opens the database without touching its schema.
    pub async fn connect(db_path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to connect to database: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:").await
    }

    pub async fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate().await?;
        Ok(store)
    }

    /// Applies pending migrations and returns the versions applied.
    pub async fn migrate(&self) -> Result<Vec<u32>, StoreError> {
        let conn = self.conn.lock().await;
        migrations::apply_all(&conn)
            .await
            .map_err(StoreError::Internal)
    }

    pub async fn migration_status(&self) -> Result<MigrationStatus, StoreError> {
        let conn = self.conn.lock().await;
        migrations::status(&conn).await.map_err(StoreError::Internal)
    }

    pub async fn rollback_last_migration(&self) -> Result<Option<u32>, StoreError> {
        let conn = self.conn.lock().await;
        migrations::rollback_last(&conn)
            .await
            .map_err(StoreError::Internal)
    }

    pub fn connection(&self) -> &Mutex<Connection> {
        &self.conn
    }
}

#[async_trait]
impl PortfolioStore for LocalStore {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT id, title, description, image_url, link_url, tags, created_at
                 FROM projects ORDER BY created_at DESC, id DESC",
                (),
            )
            .await?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(project_from_row(&row)?);
        }
        Ok(projects)
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, StoreError> {
        require_text("title", &project.title)?;

        let tags = serde_json::to_string(&project.tags)
            .map_err(|e| StoreError::Internal(format!("Failed to encode tags: {e}")))?;
        let created_at = Utc::now();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO projects (title, description, image_url, link_url, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            libsql::params![
                project.title.trim(),
                project.description.as_str(),
                optional_value(&project.image_url),
                optional_value(&project.link_url),
                tags,
                format_timestamp(created_at),
            ],
        )
        .await?;
        let id = conn.last_insert_rowid();
        debug!(project_id = id, "created project");

        Ok(Project {
            id,
            title: project.title.trim().to_string(),
            description: project.description.clone(),
            image_url: project.image_url.clone(),
            link_url: project.link_url.clone(),
            tags: project.tags.clone(),
            created_at: truncate_to_stored(created_at)?,
        })
    }

    async fn delete_project(&self, project_id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let deleted = conn
            .execute(
                "DELETE FROM projects WHERE id = ?1",
                libsql::params![project_id],
            )
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!("project {project_id}")));
        }
        Ok(())
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT id, title, issuer, issued_on, image_url, credential_url, created_at
                 FROM certificates ORDER BY created_at DESC, id DESC",
                (),
            )
            .await?;

        let mut certificates = Vec::new();
        while let Some(row) = rows.next().await? {
            certificates.push(certificate_from_row(&row)?);
        }
        Ok(certificates)
    }

    async fn create_certificate(
        &self,
        certificate: &NewCertificate,
    ) -> Result<Certificate, StoreError> {
        require_text("title", &certificate.title)?;
        require_text("issuer", &certificate.issuer)?;

        let created_at = Utc::now();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO certificates (title, issuer, issued_on, image_url, credential_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            libsql::params![
                certificate.title.trim(),
                certificate.issuer.trim(),
                optional_value(&certificate.issued_on),
                optional_value(&certificate.image_url),
                optional_value(&certificate.credential_url),
                format_timestamp(created_at),
            ],
        )
        .await?;
        let id = conn.last_insert_rowid();
        debug!(certificate_id = id, "created certificate");

        Ok(Certificate {
            id,
            title: certificate.title.trim().to_string(),
            issuer: certificate.issuer.trim().to_string(),
            issued_on: certificate.issued_on.clone(),
            image_url: certificate.image_url.clone(),
            credential_url: certificate.credential_url.clone(),
            created_at: truncate_to_stored(created_at)?,
        })
    }

    async fn insert_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, StoreError> {
        require_text("name", &message.name)?;
        require_text("email", &message.email)?;
        require_text("message", &message.message)?;

        let created_at = Utc::now();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO contacts (name, email, message, relay_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                message.name.as_str(),
                message.email.as_str(),
                message.message.as_str(),
                RelayStatus::Pending.as_str(),
                format_timestamp(created_at),
            ],
        )
        .await?;
        let id = conn.last_insert_rowid();
        debug!(contact_id = id, "stored contact message");

        Ok(ContactMessage {
            id,
            name: message.name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            relay_status: RelayStatus::Pending,
            created_at: truncate_to_stored(created_at)?,
        })
    }

    async fn mark_contact_relay(
        &self,
        message_id: i64,
        status: RelayStatus,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let updated = conn
            .execute(
                "UPDATE contacts SET relay_status = ?1 WHERE id = ?2",
                libsql::params![status.as_str(), message_id],
            )
            .await?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("contact message {message_id}")));
        }
        Ok(())
    }

    async fn list_contacts(&self, limit: u32) -> Result<Vec<ContactMessage>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT id, name, email, message, relay_status, created_at
                 FROM contacts ORDER BY created_at DESC, id DESC LIMIT ?1",
                libsql::params![i64::from(limit)],
            )
            .await?;

        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(contact_from_row(&row)?);
        }
        Ok(messages)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn optional_value(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| StoreError::Internal(format!("Invalid timestamp '{value}': {e}")))
}

/// Gives the caller the same precision a later read would.
fn truncate_to_stored(timestamp: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
    parse_timestamp(&format_timestamp(timestamp))
}

fn text(row: &Row, index: i32) -> Result<String, StoreError> {
    row.get::<String>(index)
        .map_err(|e| StoreError::Internal(e.to_string()))
}

fn project_from_row(row: &Row) -> Result<Project, StoreError> {
    let tags_json = text(row, 5)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|e| StoreError::Internal(format!("Invalid tags '{tags_json}': {e}")))?;

    Ok(Project {
        id: row.get::<i64>(0)?,
        title: text(row, 1)?,
        description: text(row, 2)?,
        image_url: row.get::<String>(3).ok(),
        link_url: row.get::<String>(4).ok(),
        tags,
        created_at: parse_timestamp(&text(row, 6)?)?,
    })
}

fn certificate_from_row(row: &Row) -> Result<Certificate, StoreError> {
    Ok(Certificate {
        id: row.get::<i64>(0)?,
        title: text(row, 1)?,
        issuer: text(row, 2)?,
        issued_on: row.get::<String>(3).ok(),
        image_url: row.get::<String>(4).ok(),
        credential_url: row.get::<String>(5).ok(),
        created_at: parse_timestamp(&text(row, 6)?)?,
    })
}

fn contact_from_row(row: &Row) -> Result<ContactMessage, StoreError> {
    Ok(ContactMessage {
        id: row.get::<i64>(0)?,
        name: text(row, 1)?,
        email: text(row, 2)?,
        message: text(row, 3)?,
        relay_status: text(row, 4)?.parse()?,
        created_at: parse_timestamp(&text(row, 5)?)?,
    })
}
