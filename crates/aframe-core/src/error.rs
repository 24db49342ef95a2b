//! Error types for aframe-core

use thiserror::Error;

/// Result type alias using aframe-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the A-Frame CLI
#[derive(Error, Debug)]
pub enum Error {
    /// No template was specified or could be resolved
    #[error("No template specified or resolvable from: {input}")]
    TemplateMissing { input: String },

    /// Bundler config file not found
    #[error("Bundler config not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid bundler config format
    #[error("Invalid bundler config: {message}")]
    InvalidConfig { message: String },

    /// Project manifest could not be read
    #[error("Could not read manifest: {path}")]
    ManifestRead { path: String },

    /// Bundler invocation failed
    #[error("Could not build \"{project_dir}\": {message}")]
    Build {
        project_dir: String,
        message: String,
    },

    /// A manifest script run through the shell failed
    #[error("Script \"{script}\" failed: {message}")]
    Script { script: String, message: String },

    /// Unknown deploy provider
    #[error("Unknown provider: {provider}. Valid providers: github-pages, ipfs, cdn")]
    InvalidProvider { provider: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a template missing error
    pub fn template_missing(input: impl Into<String>) -> Self {
        Self::TemplateMissing {
            input: input.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a manifest read error
    pub fn manifest_read(path: impl Into<String>) -> Self {
        Self::ManifestRead { path: path.into() }
    }

    /// Create a build error
    pub fn build(project_dir: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Build {
            project_dir: project_dir.into(),
            message: message.into(),
        }
    }

    /// Create a script failure error
    pub fn script(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            script: script.into(),
            message: message.into(),
        }
    }

    /// Create an invalid provider error
    pub fn invalid_provider(provider: impl Into<String>) -> Self {
        Self::InvalidProvider {
            provider: provider.into(),
        }
    }
}
