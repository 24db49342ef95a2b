//! GitHub Pages provider
//!
//! Publishes the deployed tree to the `gh-pages` branch of the target
//! repository with a scratch clone and a force push. The repository comes
//! from `--repo`, or is inferred from the project's `origin` remote.

use async_trait::async_trait;
use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::traits::{DeployContext, DeployProvider};

/// Branch GitHub Pages serves project sites from
pub const PAGES_BRANCH: &str = "gh-pages";

/// Pushes a directory as the sole content of a branch.
///
/// Split out from the provider so pipeline tests can verify publishing
/// without touching the network.
#[async_trait]
pub trait PagesPublisher: Send + Sync {
    async fn publish_dir(&self, src: &Utf8Path, repo_url: &str, branch: &str) -> Result<()>;
}

/// Publisher backed by the git CLI
pub struct GitCliPublisher;

#[async_trait]
impl PagesPublisher for GitCliPublisher {
    async fn publish_dir(&self, src: &Utf8Path, repo_url: &str, branch: &str) -> Result<()> {
        let scratch = tempfile::tempdir()?;
        let work = scratch.path().join("site");
        aframe_core::utils::copy_dir_filtered(src.as_std_path(), &work)?;

        let run = |args: Vec<String>| {
            let work = work.clone();
            async move {
                let output = Command::new("git")
                    .args(&args)
                    .current_dir(&work)
                    .output()
                    .await
                    .map_err(|_| Error::GitNotFound)?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(Error::deploy_publish(
                        src.as_str(),
                        format!("git {}: {}", args.join(" "), stderr.trim()),
                    ));
                }
                Ok(())
            }
        };

        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        run(args(&["init"])).await?;
        run(args(&["checkout", "-b", branch])).await?;
        run(args(&["add", "-A"])).await?;
        run(args(&["-c", "user.name=aframe", "-c", "user.email=aframe@localhost", "commit", "-m", "Deploy"])).await?;
        run(args(&["push", "--force", repo_url, &format!("HEAD:{branch}")])).await?;
        Ok(())
    }
}

/// GitHub Pages deploy provider
pub struct GithubPagesProvider {
    publisher: Box<dyn PagesPublisher>,
}

impl GithubPagesProvider {
    pub fn new() -> Self {
        Self {
            publisher: Box::new(GitCliPublisher),
        }
    }

    /// Provider with a custom publisher, for tests
    pub fn with_publisher(publisher: Box<dyn PagesPublisher>) -> Self {
        Self { publisher }
    }
}

impl Default for GithubPagesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeployProvider for GithubPagesProvider {
    fn name(&self) -> &'static str {
        "github-pages"
    }

    fn check_prerequisites(&self) -> Result<()> {
        which::which("git").map_err(|_| Error::GitNotFound)?;
        Ok(())
    }

    async fn publish(&self, ctx: &DeployContext) -> Result<String> {
        let slug = match &ctx.options.repo {
            Some(repo) => parse_repo_slug(repo),
            None => infer_origin_slug(&ctx.project_dir).await,
        }
        .ok_or(Error::NoRepository)?;

        let repo_url = format!("https://github.com/{}/{}.git", slug.0, slug.1);
        info!("Publishing {} to {} ({})", ctx.src_dir, repo_url, PAGES_BRANCH);
        self.publisher
            .publish_dir(&ctx.src_dir, &repo_url, PAGES_BRANCH)
            .await?;

        Ok(format!("https://{}.github.io/{}/", slug.0, slug.1))
    }
}

/// Parse `owner/repo` out of a slug or any common GitHub remote URL
pub fn parse_repo_slug(input: &str) -> Option<(String, String)> {
    let input = input.trim().trim_end_matches('/');
    let input = input.strip_suffix(".git").unwrap_or(input);

    let tail = if let Some(rest) = input.strip_prefix("git@github.com:") {
        rest
    } else if let Some(idx) = input.find("github.com/") {
        &input[idx + "github.com/".len()..]
    } else {
        input
    };

    let mut parts = tail.split('/');
    let owner = parts.next()?.trim();
    let repo = parts.next()?.trim();
    if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// `owner/repo` from the project's `origin` remote, when it points at
/// GitHub
async fn infer_origin_slug(project_dir: &Utf8Path) -> Option<(String, String)> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(project_dir)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!("origin remote: {}", url);
    parse_repo_slug(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_slug_variants() {
        let expected = Some(("aframevr".to_string(), "my-scene".to_string()));
        assert_eq!(parse_repo_slug("aframevr/my-scene"), expected);
        assert_eq!(
            parse_repo_slug("https://github.com/aframevr/my-scene.git"),
            expected
        );
        assert_eq!(
            parse_repo_slug("git@github.com:aframevr/my-scene.git"),
            expected
        );
        assert_eq!(
            parse_repo_slug("https://github.com/aframevr/my-scene/"),
            expected
        );
    }

    #[test]
    fn test_parse_repo_slug_rejects_garbage() {
        assert_eq!(parse_repo_slug("just-a-name"), None);
        assert_eq!(parse_repo_slug("a/b/c"), None);
        assert_eq!(parse_repo_slug(""), None);
    }
}
