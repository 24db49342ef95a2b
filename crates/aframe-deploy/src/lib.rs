//! # aframe-deploy
//!
//! Deploy providers for the A-Frame CLI:
//!
//! - GitHub Pages (scratch clone + force push to `gh-pages`)
//! - IPFS (local daemon lifecycle + directory hash)
//! - CDN binaries (`now` and compatible tools)
//!
//! plus the A-Frame Index API client used after a successful deploy.

pub mod cdn;
pub mod error;
pub mod github_pages;
pub mod ipfs;
pub mod submit;
pub mod traits;

use aframe_core::types::{DeployOptions, Provider};

pub use error::{Error, Result};
pub use traits::{DeployContext, DeployProvider};

/// Create a provider instance by name
pub fn create_provider(provider: Provider, options: &DeployOptions) -> Box<dyn DeployProvider> {
    match provider {
        Provider::GithubPages => Box::new(github_pages::GithubPagesProvider::new()),
        Provider::Ipfs => Box::new(ipfs::IpfsProvider::new()),
        Provider::Cdn => Box::new(cdn::CdnProvider::new(&options.cdn_bin)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_names_match_providers() {
        let options = DeployOptions::default();
        assert_eq!(
            create_provider(Provider::GithubPages, &options).name(),
            "github-pages"
        );
        assert_eq!(create_provider(Provider::Ipfs, &options).name(), "ipfs");
        assert_eq!(create_provider(Provider::Cdn, &options).name(), "cdn");
    }
}
