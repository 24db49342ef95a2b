//! IPFS provider
//!
//! Spawns a local `ipfs daemon`, waits for its readiness line, adds the
//! deployed tree for its directory hash, and shuts the daemon back down.
//! Every daemon interaction is bounded by a timeout; a daemon that never
//! becomes ready fails the deploy before any content is added.

use std::process::Stdio;

use async_trait::async_trait;
use camino::Utf8Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::traits::{DeployContext, DeployProvider};

/// Line the daemon prints once its API is up
const READY_LINE: &str = "Daemon is ready";

/// Public gateway deployed URLs point at
const GATEWAY: &str = "https://ipfs.io/ipfs";

/// Daemon lifecycle behind a trait so timeout handling can be tested
/// against a daemon that never comes up.
#[async_trait]
pub trait IpfsDaemon: Send + Sync {
    /// Start the daemon; resolves once it is ready to serve
    async fn start(&self) -> Result<()>;

    /// Add a directory and return its content hash
    async fn add_dir(&self, dir: &Utf8Path) -> Result<String>;

    /// Stop the daemon
    async fn stop(&self) -> Result<()>;
}

/// Daemon driven through the `ipfs` CLI
pub struct CliIpfsDaemon {
    child: Mutex<Option<Child>>,
}

impl CliIpfsDaemon {
    pub fn new() -> Self {
        Self {
            child: Mutex::new(None),
        }
    }
}

impl Default for CliIpfsDaemon {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpfsDaemon for CliIpfsDaemon {
    async fn start(&self) -> Result<()> {
        let mut child = Command::new("ipfs")
            .arg("daemon")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| Error::IpfsNotFound)?;

        let stdout = child.stdout.take();
        *self.child.lock().await = Some(child);

        if let Some(stdout) = stdout {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                debug!("ipfs: {}", line);
                if line.contains(READY_LINE) {
                    return Ok(());
                }
            }
        }
        Err(Error::deploy_publish(
            "ipfs",
            "daemon exited before becoming ready",
        ))
    }

    async fn add_dir(&self, dir: &Utf8Path) -> Result<String> {
        let output = Command::new("ipfs")
            .args(["add", "-r", "-Q"])
            .arg(dir)
            .output()
            .await
            .map_err(|_| Error::IpfsNotFound)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::deploy_publish(
                dir.as_str(),
                format!("ipfs add: {}", stderr.trim()),
            ));
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hash.is_empty() {
            return Err(Error::deploy_publish(dir.as_str(), "ipfs add returned no hash"));
        }
        Ok(hash)
    }

    async fn stop(&self) -> Result<()> {
        if let Some(mut child) = self.child.lock().await.take() {
            child.start_kill()?;
            child.wait().await?;
        }
        Ok(())
    }
}

/// IPFS deploy provider
pub struct IpfsProvider {
    daemon: Box<dyn IpfsDaemon>,
}

impl IpfsProvider {
    pub fn new() -> Self {
        Self {
            daemon: Box::new(CliIpfsDaemon::new()),
        }
    }

    /// Provider with a custom daemon, for tests
    pub fn with_daemon(daemon: Box<dyn IpfsDaemon>) -> Self {
        Self { daemon }
    }
}

impl Default for IpfsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeployProvider for IpfsProvider {
    fn name(&self) -> &'static str {
        "ipfs"
    }

    fn check_prerequisites(&self) -> Result<()> {
        which::which("ipfs").map_err(|_| Error::IpfsNotFound)?;
        Ok(())
    }

    async fn publish(&self, ctx: &DeployContext) -> Result<String> {
        info!("Starting IPFS daemon");
        timeout(ctx.options.ipfs_start_timeout, self.daemon.start())
            .await
            .map_err(|_| Error::deploy_timeout("IPFS daemon start"))??;

        // The tree is staged through the filtered walker so VCS metadata
        // and dependency dirs never make it into the hash.
        let result = stage_and_add(self.daemon.as_ref(), ctx).await;

        let stop = timeout(ctx.options.ipfs_stop_timeout, self.daemon.stop()).await;
        match stop {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("IPFS daemon stop failed: {}", e),
            Err(_) => return Err(Error::deploy_timeout("IPFS daemon stop")),
        }

        let hash = result?;
        Ok(format!("{GATEWAY}/{hash}/"))
    }
}

async fn stage_and_add(daemon: &dyn IpfsDaemon, ctx: &DeployContext) -> Result<String> {
    let scratch = tempfile::tempdir()?;
    let staged = scratch.path().join(&ctx.root_dir);
    aframe_core::utils::copy_dir_filtered(ctx.src_dir.as_std_path(), &staged)?;

    let staged = Utf8Path::from_path(&staged)
        .ok_or_else(|| Error::deploy_publish(ctx.src_dir.as_str(), "non-UTF-8 scratch path"))?;
    daemon.add_dir(staged).await
}
