//! Build orchestration
//!
//! Runs the project's bundler once over the source tree. A project whose
//! manifest carries a custom `scripts.build` entry is built through that
//! script instead of the built-in bundler invocation.

use camino::{Utf8Path, Utf8PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::bundler::BundlerConfig;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::types::BuildOptions;
use crate::utils;

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Configured bundler output directory, resolved against the project
    pub output_dir: Utf8PathBuf,
    /// Whether a manifest script override ran instead of the bundler
    pub used_custom_script: bool,
}

/// Build a project once.
///
/// The bundler config is resolved first so an invalid `--config` path
/// fails before any subprocess is spawned. The reported output directory
/// is the configured one; callers decide what a missing directory means.
pub async fn build_project(project_dir: &Utf8Path, options: &BuildOptions) -> Result<BuildReport> {
    let manifest = Manifest::load_or_default(project_dir);
    let (config, source) =
        BundlerConfig::load_for_project(project_dir, options.config.as_deref())?;
    debug!("Bundler config source: {:?}", source);

    let used_custom_script = if let Some(script) = manifest.custom_script("build") {
        info!("Using build script from manifest: {}", script);
        utils::run_script(project_dir, script)
            .await
            .map_err(|e| Error::build(project_dir.as_str(), e.to_string()))?;
        true
    } else {
        run_bundler(project_dir, &config, &source, options).await?;
        false
    };

    let output_dir = config.output_dir(project_dir);
    if output_dir.is_dir() {
        info!("Build output in {}", output_dir);
    } else {
        warn!("Build produced no output directory at {}", output_dir);
    }

    Ok(BuildReport {
        output_dir,
        used_custom_script,
    })
}

async fn run_bundler(
    project_dir: &Utf8Path,
    config: &BundlerConfig,
    source: &crate::bundler::ConfigSource,
    options: &BuildOptions,
) -> Result<()> {
    let mut command = Command::new(&config.bundler.command);
    command.arg("build").current_dir(project_dir);

    if let Some(path) = source.path() {
        command.arg("--config").arg(path);
    }
    if options.production {
        command.arg("--production");
    }
    if let Some(env) = &options.env {
        command.arg("--env").arg(env);
    }
    if let Some(jobs) = options.jobs {
        command.arg("--jobs").arg(jobs.to_string());
    }

    debug!(
        "Invoking bundler: {} build (in {})",
        config.bundler.command, project_dir
    );
    let status = command
        .status()
        .await
        .map_err(|e| Error::build(project_dir.as_str(), e.to_string()))?;

    if !status.success() {
        return Err(Error::build(
            project_dir.as_str(),
            format!("{} exited with {}", config.bundler.command, status),
        ));
    }
    Ok(())
}
