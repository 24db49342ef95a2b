//! HTTP server for the development loop
//!
//! Serves the bundler output directory, exposes the generation counter at
//! `GET /__aframe__/version`, and injects a polling reload script into
//! every HTML response. The upload plugin adds `POST /upload` when
//! enabled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Polls the generation counter and reloads the page when it moves
const RELOAD_SCRIPT: &str = concat!(
    "\n<script>(function(){var seen=null;async function poll(){",
    "try{var res=await fetch('/__aframe__/version',{cache:'no-store'});",
    "var v=await res.text();if(seen===null){seen=v;}else if(v!==seen){location.reload();}}",
    "catch(e){}setTimeout(poll,1000);}poll();})();</script>\n"
);

/// Directory upload records are written into, relative to the project
const UPLOAD_DIR: &str = "app/assets/video";

/// Shared state for the request handlers
#[derive(Clone)]
pub struct ServerState {
    pub project_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub generation: Arc<AtomicU64>,
}

/// Build the router. `uploads` mounts the upload plugin.
pub fn router(state: ServerState, uploads: bool) -> Router {
    let mut router = Router::new().route("/__aframe__/version", get(version));
    if uploads {
        router = router.route("/upload", post(upload));
    }
    router
        .fallback(get(static_files))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn version(State(state): State<ServerState>) -> String {
    state.generation.load(Ordering::SeqCst).to_string()
}

async fn static_files(State(state): State<ServerState>, uri: Uri) -> Response {
    let Some(path) = resolve_request_path(&state.output_dir, uri.path()) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let Ok(bytes) = tokio::fs::read(&path).await else {
        debug!("404 {}", path);
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let content_type = content_type_for(&path);
    if content_type.starts_with("text/html") {
        let html = inject_reload_script(&String::from_utf8_lossy(&bytes));
        ([(header::CONTENT_TYPE, content_type)], html).into_response()
    } else {
        ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
    }
}

/// Map a request path onto the output directory. `..` and `.` segments
/// are dropped so requests cannot escape the served tree; directory
/// requests resolve to their `index.html`.
fn resolve_request_path(root: &Utf8Path, request_path: &str) -> Option<Utf8PathBuf> {
    let path_only = request_path.split('?').next().unwrap_or("/");
    let segments: Vec<&str> = path_only
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();

    let mut path = root.to_owned();
    for segment in &segments {
        path.push(segment);
    }
    if path_only.ends_with('/') || segments.is_empty() || path.is_dir() {
        path.push("index.html");
    }
    Some(path)
}

fn inject_reload_script(html: &str) -> String {
    match html.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + RELOAD_SCRIPT.len());
            out.push_str(&html[..idx]);
            out.push_str(RELOAD_SCRIPT);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{RELOAD_SCRIPT}"),
    }
}

fn content_type_for(path: &Utf8Path) -> &'static str {
    match path.extension().unwrap_or("").to_ascii_lowercase().as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" | "gltf" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "glb" => "model/gltf-binary",
        "obj" | "mtl" | "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Accept multipart file uploads, store them under the project's video
/// assets, and record them in the manifest's `aframe.uploads` list.
async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<serde_json::Value>, (StatusCode, String)> {
    let upload_dir = state.project_dir.join(UPLOAD_DIR);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut records = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(sanitize_file_name) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

        let dest = upload_dir.join(&file_name);
        tokio::fs::write(&dest, &data)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        info!("Stored upload {} ({} bytes)", dest, data.len());

        records.push(json!({
            "src": format!("assets/video/{file_name}"),
            "type": content_type,
        }));
    }

    if records.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no files in request".to_string()));
    }

    let manifest_path = aframe_core::Manifest::path(&state.project_dir);
    if let Err(e) = aframe_core::manifest::merge_manifest_file(
        &manifest_path,
        &json!({"aframe": {"uploads": records.clone()}}),
    ) {
        warn!("Could not record uploads in manifest: {}", e);
    }

    Ok(Json(json!({ "uploads": records })))
}

/// Keep only the basename so field names cannot write outside the
/// upload directory.
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
