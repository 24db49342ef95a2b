//! Template material: embedded trees and remote checkouts
//!
//! Bundled templates are compiled into the binary and unpacked directly.
//! Remote templates are shallow-cloned into a scratch directory and copied
//! over without their VCS metadata, so the new project starts with a clean
//! history.

use camino::Utf8Path;
use rust_embed::RustEmbed;
use tokio::process::Command;
use tracing::{debug, info};

use aframe_core::utils::copy_dir_filtered;

use crate::error::{Error, Result};

/// Template trees compiled into the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
struct BundledTemplates;

/// Unpack a bundled template tree under `target`.
///
/// Embedded paths are `<alias>/<relative path>`; anything outside the
/// requested alias is ignored.
pub fn unpack_bundled(alias: &str, target: &Utf8Path) -> Result<()> {
    let prefix = format!("{alias}/");
    let mut unpacked = 0usize;

    for file in BundledTemplates::iter() {
        let Some(relative) = file.strip_prefix(&prefix) else {
            continue;
        };
        let Some(content) = BundledTemplates::get(&file) else {
            continue;
        };

        let dest = target.join(relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, content.data.as_ref())?;
        unpacked += 1;
    }

    if unpacked == 0 {
        return Err(Error::bundled_template_missing(alias));
    }
    debug!("Unpacked {} files from bundled template {}", unpacked, alias);
    Ok(())
}

/// Normalize a remote template reference to a cloneable URL.
///
/// Full URLs and SSH remotes pass through; an `owner/repo` shorthand maps
/// to GitHub over HTTPS. A trailing `.git` is tolerated either way.
pub fn clone_url(reference: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("git@")
    {
        return reference.to_string();
    }
    let reference = reference.strip_suffix(".git").unwrap_or(reference);
    format!("https://github.com/{reference}.git")
}

/// Shallow-clone a remote template and copy its working tree under
/// `target`, minus VCS metadata and installed dependencies.
pub async fn fetch_remote(reference: &str, target: &Utf8Path) -> Result<()> {
    let url = clone_url(reference);
    info!("Fetching template from {}", url);

    let scratch = tempfile::tempdir()?;
    let scratch_path = scratch.path().join("template");

    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(&url)
        .arg(&scratch_path)
        .output()
        .await
        .map_err(|_| Error::GitNotFound)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::clone_failed(reference, stderr.trim().to_string()));
    }

    copy_dir_filtered(&scratch_path, target.as_std_path())?;
    Ok(())
}
