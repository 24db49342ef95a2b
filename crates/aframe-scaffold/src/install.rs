//! Dependency installation for scaffolded projects
//!
//! Install steps are best-effort: a missing package manager or a failed
//! install leaves a usable project behind and is reported as a warning.

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::Result;

/// Run the package managers the template calls for: `npm install` when a
/// `package.json` exists and `bower install` when a `bower.json` exists.
pub async fn install_dependencies(project_dir: &Utf8Path) -> Result<()> {
    if project_dir.join("package.json").exists() {
        run_installer(project_dir, "npm").await;
    }
    if project_dir.join("bower.json").exists() {
        run_installer(project_dir, "bower").await;
    }
    Ok(())
}

async fn run_installer(project_dir: &Utf8Path, tool: &str) {
    if which::which(tool).is_err() {
        warn!("{} not found on PATH; skipping dependency install", tool);
        return;
    }

    info!("Running {} install in {}", tool, project_dir);
    let result = Command::new(tool)
        .arg("install")
        .current_dir(project_dir)
        .status()
        .await;

    match result {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("{} install exited with {}", tool, status),
        Err(e) => warn!("Could not run {} install: {}", tool, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_install_without_manifests_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        install_dependencies(dir).await.unwrap();
    }
}
