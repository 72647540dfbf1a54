//! v002: track whether each contact message was relayed by email.

use std::future::Future;
use std::pin::Pin;

use libsql::Connection;

use super::Migration;

pub fn migration() -> Migration {
    Migration {
        version: 2,
        description: "Add relay_status to contacts",
        apply,
        rollback,
    }
}

fn apply(conn: &Connection) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + '_>> {
    Box::pin(async move {
        // Rows written before relay tracking existed were relayed inline.
        conn.execute(
            "ALTER TABLE contacts ADD COLUMN relay_status TEXT NOT NULL DEFAULT 'sent'",
            (),
        )
        .await
        .map_err(|e| e.to_string())?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts(created_at)",
            (),
        )
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    })
}

fn rollback(conn: &Connection) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + '_>> {
    Box::pin(async move {
        conn.execute("DROP INDEX IF EXISTS idx_contacts_created_at", ())
            .await
            .map_err(|e| e.to_string())?;

        conn.execute("ALTER TABLE contacts RENAME TO _contacts_old", ())
            .await
            .map_err(|e| e.to_string())?;

        conn.execute(
            "CREATE TABLE contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| e.to_string())?;

        conn.execute(
            "INSERT INTO contacts (id, name, email, message, created_at)
             SELECT id, name, email, message, created_at FROM _contacts_old",
            (),
        )
        .await
        .map_err(|e| e.to_string())?;

        conn.execute("DROP TABLE _contacts_old", ())
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    })
}
