//! Template registry and resolution
//!
//! The registry is compiled into the binary and loaded once into an
//! immutable `TemplateRegistry`; resolution never touches global state.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded template registry
const REGISTRY_YAML: &str = include_str!("../templates/registry.yaml");

/// GitHub org hosting the official templates
const TEMPLATE_ORG: &str = "aframevr-userland";

/// Alias used when the user specifies no template at all
pub const DEFAULT_TEMPLATE: &str = "aframe-default-template";

/// A registered project template
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    /// Canonical alias, e.g. `aframe-default-template`
    pub alias: String,
    /// Hosted source, `owner/repo` shorthand
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Whether the template ships inside the binary
    #[serde(default)]
    pub bundled: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    templates: Vec<Template>,
}

/// Concrete source a template name resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Bundled with the CLI; copied from embedded assets
    Local { alias: String },
    /// Hosted on a Git forge; fetched as a skeleton
    Remote { reference: String },
}

impl TemplateSource {
    /// Human-readable label for log lines
    pub fn describe(&self) -> &str {
        match self {
            TemplateSource::Local { alias } => alias,
            TemplateSource::Remote { reference } => reference,
        }
    }
}

/// Immutable template registry, constructed once at startup
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    by_alias: HashMap<String, usize>,
    by_url: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Load the registry embedded in the binary
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(REGISTRY_YAML)
    }

    /// Load a registry from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml_ng::from_str(yaml)?;
        let mut by_alias = HashMap::new();
        let mut by_url = HashMap::new();
        for (idx, template) in file.templates.iter().enumerate() {
            by_alias.insert(normalize(&template.alias), idx);
            by_url.insert(template.url.clone(), idx);
        }
        Ok(Self {
            templates: file.templates,
            by_alias,
            by_url,
        })
    }

    /// All registered templates
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Look up a template by alias (any casing/prefix/suffix variant) or
    /// by its hosted URL.
    pub fn get(&self, alias_or_url: &str) -> Option<&Template> {
        self.by_alias
            .get(&normalize(alias_or_url))
            .or_else(|| self.by_url.get(alias_or_url.trim()))
            .map(|&idx| &self.templates[idx])
    }

    /// Resolve a user-supplied template name, alias, or URL to a source.
    ///
    /// Registry hits resolve to their canonical entry (local when
    /// bundled). `owner/repo` shorthands and `aframe-*-template` names
    /// outside the registry resolve to remote references. An empty input
    /// is `TemplateMissing`.
    pub fn resolve(&self, name_or_url: &str) -> Result<TemplateSource> {
        let input = name_or_url.trim();
        if input.is_empty() {
            return Err(Error::template_missing(name_or_url));
        }

        if let Some(template) = self.get(input) {
            return Ok(self.source_for(template));
        }

        if input.contains('/') {
            return Ok(TemplateSource::Remote {
                reference: input.to_string(),
            });
        }

        let full_alias = format!("aframe-{}-template", normalize(input));
        if let Some(template) = self.get(&full_alias) {
            return Ok(self.source_for(template));
        }
        if input.starts_with("aframe-") && input.ends_with("-template") {
            return Ok(TemplateSource::Remote {
                reference: format!("{}/{}", TEMPLATE_ORG, input),
            });
        }

        // Nothing matched; fall back to the default template.
        let template = self
            .get(DEFAULT_TEMPLATE)
            .ok_or_else(|| Error::template_missing(name_or_url))?;
        Ok(self.source_for(template))
    }

    fn source_for(&self, template: &Template) -> TemplateSource {
        if template.bundled {
            TemplateSource::Local {
                alias: template.alias.clone(),
            }
        } else {
            TemplateSource::Remote {
                reference: template.url.clone(),
            }
        }
    }
}

/// Normalize a template name: lowercase, trimmed, without the
/// `aframe-` prefix and `-template` suffix.
fn normalize(input: &str) -> String {
    let mut name = input.trim().to_ascii_lowercase();
    if let Some(stripped) = name.strip_prefix("aframe-") {
        name = stripped.to_string();
    }
    if let Some(stripped) = name.strip_suffix("-template") {
        name = stripped.to_string();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::embedded().unwrap()
    }

    #[test]
    fn test_embedded_registry_loads() {
        let registry = registry();
        assert!(registry.get(DEFAULT_TEMPLATE).is_some());
        assert!(registry
            .templates()
            .iter()
            .any(|t| t.alias == DEFAULT_TEMPLATE && t.bundled));
    }

    #[test]
    fn test_alias_variants_resolve_identically() {
        let registry = registry();
        let canonical = registry.resolve("aframe-default-template").unwrap();
        for variant in ["default", "Default", " DEFAULT ", "aframe-default", "default-template"] {
            assert_eq!(registry.resolve(variant).unwrap(), canonical, "{variant}");
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry();
        for input in ["default", "model", "360-tour", "aframe-360-tour-template"] {
            let first = registry.resolve(input).unwrap();
            let again = registry.resolve(first.describe()).unwrap();
            assert_eq!(first, again, "{input}");
        }
    }

    #[test]
    fn test_owner_repo_shorthand_is_remote() {
        let registry = registry();
        let source = registry.resolve("someuser/aframe-custom-template").unwrap();
        assert_eq!(
            source,
            TemplateSource::Remote {
                reference: "someuser/aframe-custom-template".to_string()
            }
        );
    }

    #[test]
    fn test_unregistered_template_pattern_maps_to_org() {
        let registry = registry();
        let source = registry.resolve("aframe-hologram-template").unwrap();
        assert_eq!(
            source,
            TemplateSource::Remote {
                reference: format!("{}/aframe-hologram-template", TEMPLATE_ORG)
            }
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        let registry = registry();
        let fallback = registry.resolve("no-such-thing").unwrap();
        assert_eq!(fallback, registry.resolve(DEFAULT_TEMPLATE).unwrap());
    }

    #[test]
    fn test_empty_input_is_missing() {
        let registry = registry();
        assert!(matches!(
            registry.resolve("   "),
            Err(Error::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_lookup_by_url() {
        let registry = registry();
        let by_url = registry.get("aframevr-userland/aframe-default-template");
        assert!(by_url.is_some_and(|t| t.alias == DEFAULT_TEMPLATE));
    }
}
