use std::sync::Arc;

use anyhow::{Context, Result};
use folio_store::LocalStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    config::FolioConfig,
    mailer::{HttpMailer, LogMailer, Mailer},
    routes,
    state::AppState,
};

pub fn build_mailer(config: &FolioConfig) -> Arc<dyn Mailer> {
    match &config.mail.relay_url {
        Some(url) => {
            info!(relay = %url, "relaying contact messages over http");
            Arc::new(HttpMailer::new(url.clone(), config.mail.relay_token.clone()))
        }
        None => {
            warn!("no mail relay configured; contact messages will only be stored and logged");
            Arc::new(LogMailer)
        }
    }
}

pub async fn build_state(config: &FolioConfig) -> Result<AppState> {
    let db_path = config.store.db_path.to_string_lossy().to_string();
    let store = LocalStore::open(&db_path)
        .await
        .with_context(|| format!("failed to open store at {db_path}"))?;

    Ok(AppState::new(Arc::new(store), build_mailer(config))
        .with_mail(config.mail.clone())
        .with_static_dir(config.server.static_dir.clone())
        .with_nav_options(config.nav))
}

/// Serves until `cancel` fires or Ctrl-C is received.
pub async fn serve(config: &FolioConfig, state: AppState, cancel: CancellationToken) -> Result<()> {
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr().context("failed to read bound address")?;

    info!(bind = %local_addr, "folio listening on http://{local_addr}");

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    info!("shutdown requested");
                    signal_cancel.cancel();
                }
            }
            _ = signal_cancel.cancelled() => {}
        }
    });

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("http server failed")?;

    info!("folio stopped");
    Ok(())
}
