use std::path::Path;

use anyhow::{Context, Result};
use folio_server::{FolioCliFlags, FolioConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run(config_path: Option<&Path>, cli: &FolioCliFlags) -> Result<()> {
    let config = FolioConfig::load(config_path, cli).context("failed to load folio config")?;

    info!(
        db = %config.store.db_path.display(),
        static_dir = %config.server.static_dir.display(),
        relay = config.relay_configured(),
        "starting folio"
    );

    let state = folio_server::build_state(&config).await?;
    folio_server::serve(&config, state, CancellationToken::new()).await
}
