use std::path::{Component, Path, PathBuf};

use axum::{
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{routes::not_found, state::AppState};

/// Client assets every page links, compiled in so a missing or partial
/// static dir still serves a working layout.
const BUNDLED_ASSETS: &[(&str, &str)] = &[
    ("css/style.css", include_str!("../../../public/css/style.css")),
    ("js/script.js", include_str!("../../../public/js/script.js")),
];

/// Joins `requested` under `root`, refusing anything but plain path segments.
pub fn resolve_asset_path(root: &Path, requested: &str) -> Option<PathBuf> {
    let requested = Path::new(requested);
    let mut resolved = root.to_path_buf();
    let mut segments = 0usize;

    for component in requested.components() {
        match component {
            Component::Normal(segment) => {
                resolved.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (segments > 0).then_some(resolved)
}

pub fn bundled_asset(requested: &str) -> Option<&'static str> {
    let segments: Vec<&str> = Path::new(requested)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect();
    let key = segments.join("/");

    BUNDLED_ASSETS
        .iter()
        .find(|(path, _)| *path == key)
        .map(|(_, body)| *body)
}

pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

pub async fn static_handler(
    State(state): State<AppState>,
    UrlPath(requested): UrlPath<String>,
) -> Response {
    let Some(path) = resolve_asset_path(&state.static_dir, &requested) else {
        warn!(path = %requested, "rejected static asset path");
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&path))],
            bytes,
        )
            .into_response(),
        Err(error) => match bundled_asset(&requested) {
            Some(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type_for(&path))],
                body,
            )
                .into_response(),
            None => {
                debug!(path = %path.display(), %error, "static asset not served");
                not_found()
            }
        },
    }
}
