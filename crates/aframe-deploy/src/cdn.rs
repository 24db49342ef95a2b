//! CDN provider
//!
//! Shells out to a static-hosting deploy binary (`now` by default) with
//! the deployed tree as its argument, streaming the tool's output through
//! tracing. The last URL the tool prints on stdout is taken as the
//! deployment URL.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::traits::{DeployContext, DeployProvider};

/// CDN deploy provider
pub struct CdnProvider {
    bin: String,
}

impl CdnProvider {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl DeployProvider for CdnProvider {
    fn name(&self) -> &'static str {
        "cdn"
    }

    fn check_prerequisites(&self) -> Result<()> {
        which::which(&self.bin).map_err(|_| Error::cdn_not_found(&self.bin))?;
        Ok(())
    }

    async fn publish(&self, ctx: &DeployContext) -> Result<String> {
        info!("Running {} {}", self.bin, ctx.src_dir);
        let mut child = Command::new(&self.bin)
            .arg(&ctx.src_dir)
            .current_dir(&ctx.project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| Error::cdn_not_found(&self.bin))?;

        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    error!("deploy: {}", line);
                }
            })
        });

        let mut url = None;
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                info!("deploy: {}", line);
                let trimmed = line.trim();
                if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                    url = Some(trimmed.to_string());
                }
            }
        }

        let status = child.wait().await?;
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        if !status.success() {
            return Err(Error::deploy_publish(
                ctx.project_dir.as_str(),
                format!("{} exited with {}", self.bin, status),
            ));
        }
        url.ok_or_else(|| {
            Error::deploy_publish(
                ctx.project_dir.as_str(),
                format!("{} printed no deployment URL", self.bin),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aframe_core::types::DeployOptions;
    use camino::Utf8Path;
    use serial_test::serial;
    use tempfile::TempDir;

    fn install_fake_bin(bin_dir: &Utf8Path, name: &str, script_body: &str) {
        let path = bin_dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        let current = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{bin_dir}:{current}"));
    }

    fn context(project_dir: &Utf8Path, cdn_bin: &str) -> DeployContext {
        DeployContext {
            project_dir: project_dir.to_owned(),
            src_dir: project_dir.to_owned(),
            root_dir: "scene".to_string(),
            manifest: aframe_core::Manifest::default(),
            options: DeployOptions {
                cdn_bin: cdn_bin.to_string(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_last_url_line_wins() {
        let bin = TempDir::new().unwrap();
        let bin_dir = Utf8Path::from_path(bin.path()).unwrap();
        install_fake_bin(
            bin_dir,
            "fake-now",
            "echo 'Deploying...'\necho 'https://old.example.now.sh'\necho 'https://scene.example.now.sh'",
        );

        let project = TempDir::new().unwrap();
        let project_dir = Utf8Path::from_path(project.path()).unwrap();

        let provider = CdnProvider::new("fake-now");
        let url = provider
            .publish(&context(project_dir, "fake-now"))
            .await
            .unwrap();
        assert_eq!(url, "https://scene.example.now.sh");
    }

    #[tokio::test]
    #[serial]
    async fn test_failing_binary_is_a_publish_error() {
        let bin = TempDir::new().unwrap();
        let bin_dir = Utf8Path::from_path(bin.path()).unwrap();
        install_fake_bin(bin_dir, "fake-now-broken", "echo 'nope' >&2\nexit 2");

        let project = TempDir::new().unwrap();
        let project_dir = Utf8Path::from_path(project.path()).unwrap();

        let provider = CdnProvider::new("fake-now-broken");
        let err = provider
            .publish(&context(project_dir, "fake-now-broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeployPublish { .. }));
    }

    #[test]
    fn test_missing_binary_fails_prerequisites() {
        let provider = CdnProvider::new("definitely-not-a-real-binary");
        assert!(matches!(
            provider.check_prerequisites(),
            Err(Error::CdnNotFound { .. })
        ));
    }

}
