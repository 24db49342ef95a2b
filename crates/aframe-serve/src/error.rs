//! Error types for aframe-serve

use thiserror::Error;

/// Result type alias using aframe-serve's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Development server error types
#[derive(Error, Debug)]
pub enum Error {
    /// Could not bind the listen address
    #[error("Could not bind {addr}: {message}")]
    ServeBind { addr: String, message: String },

    /// Filesystem watcher error
    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Core error
    #[error(transparent)]
    Core(#[from] aframe_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a bind error
    pub fn serve_bind(addr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServeBind {
            addr: addr.into(),
            message: message.into(),
        }
    }
}
