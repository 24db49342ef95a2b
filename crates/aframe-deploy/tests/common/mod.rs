//! Common test helpers for aframe-deploy integration tests
//!
//! Provides mock infrastructure following the London School TDD approach:
//! publisher doubles that record interactions instead of touching git or
//! the network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use camino::Utf8Path;

use aframe_deploy::github_pages::PagesPublisher;
use aframe_deploy::Result;

// ─── Publisher Mock Infrastructure ───────────────────────────────────────────

/// Record of a single publish call: (src, repo_url, branch)
pub type PublishCall = (String, String, String);

/// Publisher that records every call and publishes nothing
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub calls: Arc<Mutex<Vec<PublishCall>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagesPublisher for RecordingPublisher {
    async fn publish_dir(&self, src: &Utf8Path, repo_url: &str, branch: &str) -> Result<()> {
        self.calls.lock().unwrap().push((
            src.to_string(),
            repo_url.to_string(),
            branch.to_string(),
        ));
        Ok(())
    }
}
