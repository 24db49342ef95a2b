//! # aframe-core
//!
//! Core library for the A-Frame CLI providing:
//! - Project manifest (package.json) reading, merging, and rewriting
//! - Declarative bundler configuration (aframe.config.json)
//! - The template registry and template name resolution
//! - Build orchestration over the external bundler

pub mod build;
pub mod bundler;
pub mod error;
pub mod manifest;
pub mod templates;
pub mod types;
pub mod utils;

pub use build::{build_project, BuildReport};
pub use bundler::{BundlerConfig, ConfigSource, CONFIG_FILE};
pub use error::{Error, Result};
pub use manifest::{Manifest, MANIFEST_FILE};
pub use templates::{Template, TemplateRegistry, TemplateSource, DEFAULT_TEMPLATE};
pub use types::{BuildOptions, DeployOptions, Provider};
