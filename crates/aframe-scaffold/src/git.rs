//! Git and GitHub operations for freshly scaffolded projects

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Fail early when git is not on PATH
pub fn ensure_git_available() -> Result<()> {
    which::which("git").map_err(|_| Error::GitNotFound)?;
    Ok(())
}

async fn run_git(path: &Utf8Path, args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .await
        .map_err(|_| Error::GitNotFound)?;
    Ok(output)
}

async fn git_ok(path: &Utf8Path, args: &[&str]) -> Result<()> {
    let output = run_git(path, args).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git_operation(format!(
            "git {}: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(())
}

/// Initialize a git repository with an initial commit.
///
/// A directory that already carries a `.git` is left alone.
pub async fn init_repository(path: &Utf8Path) -> Result<()> {
    ensure_git_available()?;

    if path.join(".git").exists() {
        debug!("Git repository already exists at {}", path);
        return Ok(());
    }

    info!("Initializing git repository at {}", path);
    git_ok(path, &["init"]).await?;
    git_ok(path, &["add", "-A"]).await?;
    git_ok(path, &["commit", "-m", "Initial commit"]).await?;
    Ok(())
}

/// The `origin` remote URL, when one is configured
pub async fn origin_url(path: &Utf8Path) -> Result<Option<String>> {
    let output = run_git(path, &["remote", "get-url", "origin"]).await?;
    if !output.status.success() {
        return Ok(None);
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!url.is_empty()).then_some(url))
}

/// Create a GitHub repository for the project via the `gh` CLI and wire
/// it up as `origin`. An existing `origin` remote wins; no second remote
/// is added.
///
/// Returns the repository URL.
pub async fn create_github_repo(path: &Utf8Path, slug: &str) -> Result<String> {
    which::which("gh").map_err(|_| Error::GhNotFound)?;

    let auth = Command::new("gh")
        .args(["auth", "status"])
        .output()
        .await
        .map_err(|_| Error::GhNotFound)?;
    if !auth.status.success() {
        return Err(Error::GhNotAuthenticated);
    }

    if let Some(existing) = origin_url(path).await? {
        info!("Remote origin already set to {}", existing);
        return Ok(existing);
    }

    info!("Creating GitHub repository {}", slug);
    let output = Command::new("gh")
        .args(["repo", "create", slug, "--public", "--source", ".", "--remote", "origin"])
        .current_dir(path)
        .output()
        .await
        .map_err(|_| Error::GhNotFound)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git_operation(format!(
            "gh repo create: {}",
            stderr.trim()
        )));
    }

    match origin_url(path).await? {
        Some(url) => Ok(url),
        None => Ok(format!("https://github.com/{slug}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).unwrap()
    }

    #[tokio::test]
    async fn test_init_creates_repository_with_commit() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8(tmp.path());
        std::fs::write(dir.join("index.html"), "<html>").unwrap();

        // Local identity so the commit works on machines without a
        // global git config.
        git_ok(dir, &["init"]).await.unwrap();
        git_ok(dir, &["config", "user.name", "Test"]).await.unwrap();
        git_ok(dir, &["config", "user.email", "test@example.com"])
            .await
            .unwrap();
        git_ok(dir, &["add", "-A"]).await.unwrap();
        git_ok(dir, &["commit", "-m", "Initial commit"]).await.unwrap();

        // Re-running is a no-op.
        init_repository(dir).await.unwrap();

        let output = run_git(dir, &["log", "--oneline"]).await.unwrap();
        let log = String::from_utf8_lossy(&output.stdout);
        assert_eq!(log.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_origin_url_absent_on_fresh_repo() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8(tmp.path());
        git_ok(dir, &["init"]).await.unwrap();

        assert_eq!(origin_url(dir).await.unwrap(), None);

        git_ok(
            dir,
            &["remote", "add", "origin", "https://github.com/u/scene.git"],
        )
        .await
        .unwrap();
        assert_eq!(
            origin_url(dir).await.unwrap().as_deref(),
            Some("https://github.com/u/scene.git")
        );
    }
}
