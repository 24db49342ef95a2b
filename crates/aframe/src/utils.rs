//! Shared helpers for command handlers

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Resolve the project directory a command operates on: the given
/// directory or the current one, canonicalized so basenames are real.
pub fn resolve_project_dir(directory: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let dir = directory.unwrap_or(Utf8Path::new("."));
    let resolved = dir
        .canonicalize_utf8()
        .with_context(|| format!("Project directory not found: {dir}"))?;
    Ok(resolved)
}
