//! `aframe serve` command handler

use anyhow::Result;

use aframe_core::utils::env_truthy;
use aframe_serve::{display_url, serve, ServeOptions};

use crate::cli::ServeArgs;
use crate::output;
use crate::utils::resolve_project_dir;

pub async fn run(args: ServeArgs) -> Result<()> {
    let project_dir = resolve_project_dir(args.directory.as_deref())?;

    // Flags beat env vars beat the project's server section.
    let (config, _) =
        aframe_core::BundlerConfig::load_for_project(&project_dir, args.bundler.config.as_deref())?;
    let host = args
        .host
        .clone()
        .or_else(|| std::env::var("HOST").ok())
        .or_else(|| std::env::var("IP").ok())
        .unwrap_or_else(|| config.server.host.clone());
    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(config.server.port);
    let https = args.https || env_truthy("HTTPS") || env_truthy("SSL");
    tracing::debug!("Resolved listen address {}:{}", host, port);

    let options = ServeOptions {
        host: Some(host.clone()),
        port: Some(port),
        https,
        uploads: args.uploads,
        clipboard: !args.no_clipboard,
        open_browser: !args.no_open,
        stdin: args.stdin,
        build: args.bundler.to_options(),
    };

    output::info(&format!(
        "Serving {} at {}",
        project_dir,
        display_url(&host, port, https)
    ));
    output::info("Press Ctrl-C to stop");

    serve(&project_dir, &options).await?;
    Ok(())
}
