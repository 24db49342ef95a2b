//! # aframe-scaffold
//!
//! Project initializer for the A-Frame CLI providing:
//! - Bundled template unpacking and remote template checkouts
//! - Git operations (init, initial commit, GitHub repository creation)
//! - Dependency installation and manifest rewriting for new projects

pub mod error;
pub mod fetch;
pub mod git;
pub mod install;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use aframe_core::manifest::{global_git_author, Manifest};
use aframe_core::templates::TemplateSource;

pub use error::{Error, Result};

/// `.gitignore` seeded into projects whose template ships none
const DEFAULT_GITIGNORE: &str = include_str!("../assets/default.gitignore");

/// Options for creating a project
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Scaffold into a non-empty directory
    pub force: bool,
    /// Run the template's package managers after unpacking
    pub install_deps: bool,
    /// Initialize a git repository with an initial commit
    pub git_init: bool,
    /// Create a GitHub repository with this slug and add it as `origin`
    pub github: Option<String>,
    /// Copy the repository URL to the clipboard
    pub clipboard: bool,
    /// Open the repository URL in the browser
    pub open_browser: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            force: false,
            install_deps: true,
            git_init: true,
            github: None,
            clipboard: true,
            open_browser: true,
        }
    }
}

/// Outcome of a successful `create`
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// The scaffolded project directory
    pub project_dir: Utf8PathBuf,
    /// Name the project manifest was rewritten to
    pub project_name: String,
    /// GitHub repository URL, when one was created or already configured
    pub github_url: Option<String>,
}

/// Scaffold a project from a resolved template source.
///
/// The target directory must be empty unless `force` is set; a non-empty
/// target without `force` fails before anything is written. Git init
/// failures propagate; dependency install and GitHub publishing are
/// best-effort around it.
pub async fn create_project(
    source: &TemplateSource,
    target: &Utf8Path,
    options: &CreateOptions,
) -> Result<CreateReport> {
    if target.exists() && !options.force && !is_empty_dir(target)? {
        return Err(Error::directory_exists(target.as_str()));
    }
    std::fs::create_dir_all(target)?;

    match source {
        TemplateSource::Local { alias } => {
            info!("Copying bundled template {}", alias);
            fetch::unpack_bundled(alias, target)?;
        }
        TemplateSource::Remote { reference } => {
            fetch::fetch_remote(reference, target).await?;
        }
    }

    let project_name = project_name_for(target);
    rewrite_manifest(target, &project_name).await?;
    seed_gitignore(target)?;

    if options.install_deps {
        install::install_dependencies(target).await?;
    }

    if options.git_init {
        git::init_repository(target).await?;
    }

    let github_url = match &options.github {
        Some(slug) => {
            let slug = if slug.is_empty() { &project_name } else { slug };
            match git::create_github_repo(target, slug).await {
                Ok(url) => {
                    if options.clipboard {
                        aframe_core::utils::copy_to_clipboard(&url);
                    }
                    if options.open_browser {
                        aframe_core::utils::open_in_browser(&url);
                    }
                    Some(url)
                }
                Err(e) => {
                    warn!("Could not create GitHub repository {}: {}", slug, e);
                    None
                }
            }
        }
        None => None,
    };

    Ok(CreateReport {
        project_dir: target.to_owned(),
        project_name,
        github_url,
    })
}

/// Project name: basename of the target directory
fn project_name_for(target: &Utf8Path) -> String {
    target
        .canonicalize_utf8()
        .ok()
        .and_then(|p| p.file_name().map(str::to_string))
        .or_else(|| target.file_name().map(str::to_string))
        .unwrap_or_else(|| "aframe-scene".to_string())
}

async fn rewrite_manifest(target: &Utf8Path, project_name: &str) -> Result<()> {
    let mut manifest = Manifest::load_or_default(target);
    let author = global_git_author().await;
    manifest.rewrite_for_project(project_name, author.as_deref());
    manifest.save(target)?;
    debug!("Rewrote manifest for {}", project_name);
    Ok(())
}

fn seed_gitignore(target: &Utf8Path) -> Result<()> {
    let path = target.join(".gitignore");
    if !path.exists() {
        std::fs::write(&path, DEFAULT_GITIGNORE)?;
    }
    Ok(())
}

fn is_empty_dir(path: &Utf8Path) -> Result<bool> {
    Ok(path.as_std_path().read_dir()?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use serial_test::serial;
    use tempfile::TempDir;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).unwrap()
    }

    fn offline_options() -> CreateOptions {
        CreateOptions {
            install_deps: false,
            git_init: false,
            ..Default::default()
        }
    }

    fn local_default() -> TemplateSource {
        TemplateSource::Local {
            alias: "aframe-default-template".to_string(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_create_from_bundled_template() {
        let tmp = TempDir::new().unwrap();
        let target = utf8(tmp.path()).join("my-scene");

        let report = create_project(&local_default(), &target, &offline_options())
            .await
            .unwrap();

        assert_eq!(report.project_name, "my-scene");
        assert!(target.join("app/index.html").exists());
        assert!(target.join(".gitignore").exists());
        assert!(!target.join(".git").exists());

        let manifest = Manifest::load(&target).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("my-scene"));
        assert_eq!(manifest.version.as_deref(), Some("0.0.0"));
        assert_eq!(manifest.private, Some(true));
        assert!(manifest.aframe["basedOn"]
            .as_object()
            .is_some_and(|m| m.contains_key("aframe-default-template")));
    }

    #[tokio::test]
    #[serial]
    async fn test_create_survives_github_failure() {
        let tmp = TempDir::new().unwrap();
        let target = utf8(tmp.path()).join("my-scene");

        // PATH with no gh on it, so repository creation cannot succeed
        let saved_path = std::env::var_os("PATH");
        let empty = TempDir::new().unwrap();
        std::env::set_var("PATH", empty.path());

        let options = CreateOptions {
            github: Some("me/my-scene".to_string()),
            clipboard: false,
            open_browser: false,
            ..offline_options()
        };
        let result = create_project(&local_default(), &target, &options).await;

        match saved_path {
            Some(p) => std::env::set_var("PATH", p),
            None => std::env::remove_var("PATH"),
        }

        let report = result.unwrap();
        assert_eq!(report.github_url, None);
        assert!(target.join("app/index.html").exists());
        assert_eq!(report.project_name, "my-scene");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_into_nonempty_dir_fails_untouched() {
        let tmp = TempDir::new().unwrap();
        let target = utf8(tmp.path());
        std::fs::write(target.join("keep.txt"), "precious").unwrap();

        let err = create_project(&local_default(), target, &offline_options())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DirectoryExists { .. }));
        assert!(target.join("keep.txt").exists());
        assert!(!target.join("package.json").exists());
    }

    #[tokio::test]
    #[serial]
    async fn test_create_with_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        let target = utf8(tmp.path());
        std::fs::write(target.join("keep.txt"), "precious").unwrap();

        let options = CreateOptions {
            force: true,
            ..offline_options()
        };
        create_project(&local_default(), target, &options)
            .await
            .unwrap();

        assert!(target.join("keep.txt").exists());
        assert!(target.join("package.json").exists());
    }
}
