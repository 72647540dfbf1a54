use anyhow::{Context, Result};
use clap::Subcommand;
use folio_server::FolioConfig;
use folio_store::{LocalStore, migrations};

use super::db_path;

#[derive(Subcommand, Debug, PartialEq)]
pub enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Show applied and pending migrations
    Status,
    /// Roll back the most recently applied migration
    Rollback,
}

impl DbCommands {
    pub async fn run(self, config: &FolioConfig) -> Result<()> {
        let path = db_path(config);
        let store = LocalStore::connect(&path)
            .await
            .with_context(|| format!("failed to open database {path}"))?;

        match self {
            DbCommands::Migrate => {
                let applied = store.migrate().await.context("migration failed")?;
                if applied.is_empty() {
                    println!("Database is up to date");
                } else {
                    for version in applied {
                        println!("✓ Applied migration {version:03}");
                    }
                }
            }
            DbCommands::Status => {
                let status = store
                    .migration_status()
                    .await
                    .context("failed to read migration status")?;
                println!("Database: {path}");
                for migration in migrations::all_migrations() {
                    let state = if status.applied.contains(&migration.version) {
                        "applied"
                    } else {
                        "pending"
                    };
                    println!(
                        "  {:03}  {:<8} {}",
                        migration.version, state, migration.description
                    );
                }
            }
            DbCommands::Rollback => {
                match store
                    .rollback_last_migration()
                    .await
                    .context("rollback failed")?
                {
                    Some(version) => println!("✓ Rolled back migration {version:03}"),
                    None => println!("No migrations to roll back"),
                }
            }
        }

        Ok(())
    }
}
