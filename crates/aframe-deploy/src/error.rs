//! Error types for aframe-deploy

use thiserror::Error;

/// Result type alias using aframe-deploy's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Deployment error types
#[derive(Error, Debug)]
pub enum Error {
    /// Publishing the site failed
    #[error("Could not deploy \"{project_dir}\": {message}")]
    DeployPublish {
        project_dir: String,
        message: String,
    },

    /// A bounded deploy step did not finish in time
    #[error("Timed out waiting for {operation}")]
    DeployTimeout { operation: String },

    /// No repository to publish to could be determined
    #[error("No GitHub repository configured. Pass --repo or add an origin remote")]
    NoRepository,

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// IPFS command not found
    #[error("ipfs command not found. Please install IPFS: https://ipfs.io/docs/install/")]
    IpfsNotFound,

    /// CDN deploy binary not found
    #[error("Deploy binary \"{bin}\" not found on PATH")]
    CdnNotFound { bin: String },

    /// Index API submission failed
    #[error("Could not submit site to the A-Frame Index: {message}")]
    Submit { message: String },

    /// Core error
    #[error(transparent)]
    Core(#[from] aframe_core::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a publish error
    pub fn deploy_publish(project_dir: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeployPublish {
            project_dir: project_dir.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn deploy_timeout(operation: impl Into<String>) -> Self {
        Self::DeployTimeout {
            operation: operation.into(),
        }
    }

    /// Create a CDN binary missing error
    pub fn cdn_not_found(bin: impl Into<String>) -> Self {
        Self::CdnNotFound { bin: bin.into() }
    }

    /// Create a submission error
    pub fn submit(message: impl Into<String>) -> Self {
        Self::Submit {
            message: message.into(),
        }
    }
}
