//! Error types for aframe-scaffold

use thiserror::Error;

/// Result type alias using aframe-scaffold's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project initialization error types
#[derive(Error, Debug)]
pub enum Error {
    /// Target directory already has content
    #[error("Directory is not empty: {path}. Pass --force to scaffold into it anyway")]
    DirectoryExists { path: String },

    /// Bundled template assets missing from the binary
    #[error("Bundled template not found: {alias}")]
    BundledTemplateMissing { alias: String },

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// GitHub CLI (gh) not found
    #[error("GitHub CLI (gh) not found. Please install gh CLI: https://cli.github.com/")]
    GhNotFound,

    /// GitHub CLI not authenticated
    #[error("GitHub CLI is not authenticated. Please run: gh auth login")]
    GhNotAuthenticated,

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Template clone failed
    #[error("Could not fetch template \"{reference}\": {message}")]
    CloneFailed { reference: String, message: String },

    /// Core error
    #[error(transparent)]
    Core(#[from] aframe_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a directory exists error
    pub fn directory_exists(path: impl Into<String>) -> Self {
        Self::DirectoryExists { path: path.into() }
    }

    /// Create a bundled template missing error
    pub fn bundled_template_missing(alias: impl Into<String>) -> Self {
        Self::BundledTemplateMissing {
            alias: alias.into(),
        }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Create a clone failed error
    pub fn clone_failed(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloneFailed {
            reference: reference.into(),
            message: message.into(),
        }
    }
}
