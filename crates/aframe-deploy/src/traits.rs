//! Provider trait definitions

use async_trait::async_trait;
use camino::Utf8PathBuf;

use aframe_core::types::DeployOptions;
use aframe_core::Manifest;

use crate::error::Result;

/// What a provider publishes and where it came from
#[derive(Debug, Clone)]
pub struct DeployContext {
    /// The project being deployed
    pub project_dir: Utf8PathBuf,
    /// Directory whose contents go live (bundler output, or the project
    /// directory itself when no build output exists)
    pub src_dir: Utf8PathBuf,
    /// Label for the deployed tree, shown in logs
    pub root_dir: String,
    /// Manifest read from the source or project directory
    pub manifest: Manifest,
    /// Deploy options as resolved by the command
    pub options: DeployOptions,
}

/// Provider trait for deployment backends
#[async_trait]
pub trait DeployProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Check if all prerequisites are met
    fn check_prerequisites(&self) -> Result<()>;

    /// Publish the site and return its public URL
    async fn publish(&self, ctx: &DeployContext) -> Result<String>;
}
