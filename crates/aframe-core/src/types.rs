//! Shared option and provider types consumed by the orchestrator crates

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use camino::Utf8PathBuf;

use crate::error::Error;

/// Deploy target provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Push the build output to a `gh-pages` branch
    GithubPages,
    /// Add the build output to a local IPFS node
    Ipfs,
    /// Shell out to a generic CDN deploy binary
    Cdn,
}

impl Provider {
    /// Provider name as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GithubPages => "github-pages",
            Provider::Ipfs => "ipfs",
            Provider::Cdn => "cdn",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github-pages" | "ghpages" | "gh-pages" => Ok(Provider::GithubPages),
            "ipfs" => Ok(Provider::Ipfs),
            "cdn" | "now" => Ok(Provider::Cdn),
            other => Err(Error::invalid_provider(other)),
        }
    }
}

/// Options for the build orchestrator
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Explicit bundler config path (`-c/--config`)
    pub config: Option<Utf8PathBuf>,
    /// Production build (`-p/--production`)
    pub production: bool,
    /// Environment name forwarded to the bundler (`-e/--env`)
    pub env: Option<String>,
    /// Worker count forwarded to the bundler (`-j/--jobs`)
    pub jobs: Option<usize>,
}

/// Options for the deploy orchestrator
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Deploy target provider
    pub provider: Provider,
    /// Repository slug (`owner/repo`) for GitHub Pages
    pub repo: Option<String>,
    /// Deploy binary for the generic CDN provider
    pub cdn_bin: String,
    /// Skip submitting the deployed URL to the A-Frame Index
    pub no_submit: bool,
    /// Skip copying the deployed URL to the clipboard
    pub no_clipboard: bool,
    /// Skip opening the deployed URL in a browser
    pub no_open: bool,
    /// Bounded wait for the IPFS node to report ready
    pub ipfs_start_timeout: Duration,
    /// Bounded wait for the IPFS node to stop
    pub ipfs_stop_timeout: Duration,
    /// Bounded wait for the Index submission response
    pub submit_timeout: Duration,
    /// Build options used for the BUILDING step
    pub build: BuildOptions,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            provider: Provider::GithubPages,
            repo: None,
            cdn_bin: "now".to_string(),
            no_submit: false,
            no_clipboard: false,
            no_open: false,
            ipfs_start_timeout: Duration::from_secs(3),
            ipfs_stop_timeout: Duration::from_secs(3),
            submit_timeout: Duration::from_secs(10),
            build: BuildOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "github-pages".parse::<Provider>().unwrap(),
            Provider::GithubPages
        );
        assert_eq!("gh-pages".parse::<Provider>().unwrap(), Provider::GithubPages);
        assert_eq!("IPFS".parse::<Provider>().unwrap(), Provider::Ipfs);
        assert_eq!("cdn".parse::<Provider>().unwrap(), Provider::Cdn);
        assert!("s3".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_round_trip() {
        for provider in [Provider::GithubPages, Provider::Ipfs, Provider::Cdn] {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }
}
