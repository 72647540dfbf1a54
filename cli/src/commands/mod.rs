use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use folio_server::{FolioCliFlags, FolioConfig};
use folio_store::LocalStore;

pub mod content;
pub mod db;
pub mod serve;

pub use content::{CertificateCommands, ContactCommands, ProjectCommands};
pub use db::DbCommands;

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Serve the portfolio site
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:3000
        #[arg(long)]
        bind: Option<String>,
        /// Database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Directory served under /static
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Inspect and migrate the database schema
    Db {
        #[arg(long, global = true)]
        db: Option<PathBuf>,
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Manage portfolio projects
    Projects {
        #[arg(long, global = true)]
        db: Option<PathBuf>,
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage certificates
    Certificates {
        #[arg(long, global = true)]
        db: Option<PathBuf>,
        #[command(subcommand)]
        command: CertificateCommands,
    },

    /// Read stored contact messages
    Contacts {
        #[arg(long, global = true)]
        db: Option<PathBuf>,
        #[command(subcommand)]
        command: ContactCommands,
    },
}

impl Commands {
    pub async fn run(self, config_path: Option<&Path>) -> Result<()> {
        match self {
            Commands::Serve {
                bind,
                db,
                static_dir,
            } => {
                let cli = FolioCliFlags {
                    bind,
                    db_path: db,
                    static_dir,
                };
                serve::run(config_path, &cli).await
            }
            Commands::Db { db, command } => {
                let config = load_config(config_path, db)?;
                command.run(&config).await
            }
            Commands::Projects { db, command } => {
                let store = open_store(&load_config(config_path, db)?).await?;
                command.run(&store).await
            }
            Commands::Certificates { db, command } => {
                let store = open_store(&load_config(config_path, db)?).await?;
                command.run(&store).await
            }
            Commands::Contacts { db, command } => {
                let store = open_store(&load_config(config_path, db)?).await?;
                command.run(&store).await
            }
        }
    }
}

fn load_config(config_path: Option<&Path>, db: Option<PathBuf>) -> Result<FolioConfig> {
    let cli = FolioCliFlags {
        db_path: db,
        ..Default::default()
    };
    FolioConfig::load(config_path, &cli).context("failed to load folio config")
}

pub(crate) fn db_path(config: &FolioConfig) -> String {
    config.store.db_path.to_string_lossy().to_string()
}

/// Opens the configured store with migrations applied.
async fn open_store(config: &FolioConfig) -> Result<LocalStore> {
    let path = db_path(config);
    LocalStore::open(&path)
        .await
        .with_context(|| format!("failed to open database {path}"))
}
