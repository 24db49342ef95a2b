//! # aframe-serve
//!
//! Development server for the A-Frame CLI providing:
//! - Initial build plus rebuild-on-change through a filesystem watcher
//! - Static serving of the bundler output with an injected reload script
//! - An opt-in multipart upload plugin recording assets in the manifest

pub mod error;
pub mod server;
pub mod watch;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use camino::Utf8Path;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use aframe_core::types::BuildOptions;
use aframe_core::{BundlerConfig, Manifest};

pub use error::{Error, Result};
pub use server::ServerState;

/// Options for the serve command
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Listen host; falls back to the config's server section
    pub host: Option<String>,
    /// Listen port; falls back to the config's server section
    pub port: Option<u16>,
    /// Print and copy an `https://` URL instead of `http://`
    pub https: bool,
    /// Mount the upload plugin at `POST /upload`
    pub uploads: bool,
    /// Copy the URL to the clipboard
    pub clipboard: bool,
    /// Open the URL in the browser
    pub open_browser: bool,
    /// Shut down when stdin closes (for wrapper tooling)
    pub stdin: bool,
    /// Options forwarded to the initial build and every rebuild
    pub build: BuildOptions,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            https: false,
            uploads: false,
            clipboard: true,
            open_browser: true,
            stdin: false,
            build: BuildOptions::default(),
        }
    }
}

/// The URL printed, copied, and opened for a bound server. A wildcard
/// host is shown as `localhost` since `0.0.0.0` is not routable from a
/// browser.
pub fn display_url(host: &str, port: u16, https: bool) -> String {
    let scheme = if https { "https" } else { "http" };
    let shown_host = if host == "0.0.0.0" { "localhost" } else { host };
    format!("{scheme}://{shown_host}:{port}/")
}

/// Serve a project: build it, watch it, and host the output until
/// interrupted.
///
/// A manifest `scripts.serve` entry that differs from the tool's own
/// invocation replaces the built-in server entirely.
pub async fn serve(project_dir: &Utf8Path, options: &ServeOptions) -> Result<()> {
    let manifest = Manifest::load_or_default(project_dir);
    if let Some(script) = manifest.custom_script("serve") {
        info!("Using serve script from manifest: {}", script);
        aframe_core::utils::run_script(project_dir, script).await?;
        return Ok(());
    }

    let (config, _) = BundlerConfig::load_for_project(project_dir, options.build.config.as_deref())?;
    let output_dir = config.output_dir(project_dir);
    let host = options
        .host
        .clone()
        .unwrap_or_else(|| config.server.host.clone());
    let port = options.port.unwrap_or(config.server.port);

    // First build is best-effort; static templates serve fine without one.
    if let Err(e) = aframe_core::build_project(project_dir, &options.build).await {
        warn!("Initial build failed: {}", e);
    }

    let generation = Arc::new(AtomicU64::new(0));
    let _rebuild = watch::spawn_rebuild_loop(
        project_dir,
        &output_dir,
        &options.build,
        generation.clone(),
    )?;

    let state = ServerState {
        project_dir: project_dir.to_owned(),
        output_dir: output_dir.clone(),
        generation,
    };
    let router = server::router(state, options.uploads);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::serve_bind(&addr, e.to_string()))?;

    let url = display_url(&host, port, options.https);
    info!("Serving {} at {}", output_dir, url);
    if options.clipboard {
        aframe_core::utils::copy_to_clipboard(&url);
    }
    if options.open_browser {
        aframe_core::utils::open_in_browser(&url);
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(options.stdin))
        .await?;
    Ok(())
}

/// Resolves on SIGINT/SIGTERM, or on stdin EOF when `wait_stdin` is set
async fn shutdown_signal(wait_stdin: bool) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let stdin_closed = async {
        if wait_stdin {
            let mut stdin = tokio::io::stdin();
            let mut buf = [0u8; 1024];
            loop {
                match stdin.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        } else {
            std::future::pending::<()>().await
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received interrupt; shutting down"),
        _ = terminate => info!("Received terminate; shutting down"),
        _ = stdin_closed => info!("Stdin closed; shutting down"),
    }
}
