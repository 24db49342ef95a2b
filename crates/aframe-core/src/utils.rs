//! Shared utility functions for the aframe crates

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Directory names never copied into a new project and never published:
/// VCS metadata plus installed dependency trees.
pub const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules", "bower_components"];

/// Whether a directory entry name is VCS metadata or a dependency tree
pub fn is_skipped_dir(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name)
}

/// Run a manifest script through the shell from a project directory.
/// The script's exit status is authoritative.
pub async fn run_script(project_dir: &Utf8Path, script: &str) -> Result<()> {
    debug!("Running script in {}: {}", project_dir, script);
    let status = Command::new("sh")
        .arg("-c")
        .arg(script)
        .current_dir(project_dir)
        .status()
        .await?;

    if !status.success() {
        return Err(Error::script(script, format!("exit status {}", status)));
    }
    Ok(())
}

/// Recursively copy a directory, skipping VCS metadata and dependency
/// directories at every level.
pub fn copy_dir_filtered(from: &std::path::Path, to: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let name = entry.file_name();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if is_skipped_dir(&name.to_string_lossy()) {
                continue;
            }
            copy_dir_filtered(&entry.path(), &to.join(&name))?;
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), to.join(&name))?;
        }
    }
    Ok(())
}

/// Read an environment variable as a truthy flag
/// (`1`, `true`, `yes`, `on`, case-insensitive).
pub fn env_truthy(name: &str) -> bool {
    std::env::var(name)
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Copy text to the system clipboard. Best-effort: failures are logged
/// and never abort the parent command.
pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => debug!("Copied to clipboard: {}", text),
        Err(e) => warn!("Could not copy to clipboard: {}", e),
    }
}

/// Open a URL in the default browser. Best-effort.
pub fn open_in_browser(url: &str) {
    if let Err(e) = webbrowser::open(url) {
        warn!("Could not open browser for {}: {}", url, e);
    }
}
