//! Declarative bundler configuration
//!
//! The original toolchain loaded `brunch-config.js` by executing it; here
//! the config is a plain JSON file (`aframe.config.json`) validated
//! through serde. Resolution order: explicit `--config` path, then the
//! project's own file, then the default bundled into the binary.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bundler config file name inside a project directory
pub const CONFIG_FILE: &str = "aframe.config.json";

/// Default config compiled into the binary, used when a project ships none
const DEFAULT_CONFIG: &str = include_str!("../config/default.json");

/// Where a bundler config was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag
    Explicit(Utf8PathBuf),
    /// `<project>/aframe.config.json`
    Project(Utf8PathBuf),
    /// Embedded default
    Default,
}

impl ConfigSource {
    /// The on-disk path, when there is one
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Project(path) => Some(path),
            ConfigSource::Default => None,
        }
    }
}

/// Bundler section: which external bundler binary to invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerSection {
    /// Bundler executable name or path
    pub command: String,
}

impl Default for BundlerSection {
    fn default() -> Self {
        Self {
            command: "brunch".to_string(),
        }
    }
}

/// Paths section: where the bundler writes its output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Build output directory, relative to the project directory
    pub public: Utf8PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            public: Utf8PathBuf::from(".public"),
        }
    }
}

/// Server section: host/port hints for the serve command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3333,
        }
    }
}

/// Validated bundler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlerConfig {
    pub bundler: BundlerSection,
    pub paths: PathsSection,
    pub server: ServerSection,
}

impl BundlerConfig {
    /// Resolve which config file applies to a project.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// project-level file silently falls back to the embedded default.
    pub fn resolve_source(
        project_dir: &Utf8Path,
        explicit: Option<&Utf8Path>,
    ) -> Result<ConfigSource> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            return Ok(ConfigSource::Explicit(path.to_owned()));
        }

        let project_config = project_dir.join(CONFIG_FILE);
        if project_config.exists() {
            return Ok(ConfigSource::Project(project_config));
        }

        Ok(ConfigSource::Default)
    }

    /// Load the config from a resolved source
    pub fn load(source: &ConfigSource) -> Result<Self> {
        let text = match source.path() {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_CONFIG.to_string(),
        };
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        Ok(config)
    }

    /// Resolve and load in one step
    pub fn load_for_project(
        project_dir: &Utf8Path,
        explicit: Option<&Utf8Path>,
    ) -> Result<(Self, ConfigSource)> {
        let source = Self::resolve_source(project_dir, explicit)?;
        let config = Self::load(&source)?;
        Ok((config, source))
    }

    /// The build output directory resolved against the project directory
    pub fn output_dir(&self, project_dir: &Utf8Path) -> Utf8PathBuf {
        if self.paths.public.is_absolute() {
            self.paths.public.clone()
        } else {
            project_dir.join(&self.paths.public)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_default_parses() {
        let config = BundlerConfig::load(&ConfigSource::Default).unwrap();
        assert_eq!(config.paths.public, Utf8PathBuf::from(".public"));
        assert_eq!(config.server.port, 3333);
        assert_eq!(config.bundler.command, "brunch");
    }

    #[test]
    fn test_resolution_order() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();

        // No file anywhere: default
        let source = BundlerConfig::resolve_source(dir, None).unwrap();
        assert_eq!(source, ConfigSource::Default);

        // Project file takes over
        let project_config = dir.join(CONFIG_FILE);
        std::fs::write(&project_config, r#"{"paths":{"public":"public"}}"#).unwrap();
        let source = BundlerConfig::resolve_source(dir, None).unwrap();
        assert_eq!(source, ConfigSource::Project(project_config.clone()));

        // Explicit flag wins over the project file
        let custom = dir.join("custom.json");
        std::fs::write(&custom, r#"{}"#).unwrap();
        let source = BundlerConfig::resolve_source(dir, Some(&custom)).unwrap();
        assert_eq!(source, ConfigSource::Explicit(custom));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let missing = dir.join("nope.json");
        let err = BundlerConfig::resolve_source(dir, Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, r#"{"plugins":{"babel":{}}}"#).unwrap();

        let err = BundlerConfig::load(&ConfigSource::Project(path)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_output_dir_resolution() {
        let config = BundlerConfig::default();
        let out = config.output_dir(Utf8Path::new("/work/scene"));
        assert_eq!(out, Utf8PathBuf::from("/work/scene/.public"));
    }
}
