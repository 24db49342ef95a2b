//! Project manifest (`package.json`) reading, merging, and rewriting
//!
//! The manifest carries conventional npm keys plus a tool-specific
//! `aframe` namespace (template lineage, merged keywords, upload records).

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Manifest file name inside a project directory
pub const MANIFEST_FILE: &str = "package.json";

/// Default script invocations shipped in bundled templates.
/// A manifest script that differs from these is treated as a project
/// override and shelled out to instead of the built-in orchestrator.
pub const DEFAULT_BUILD_SCRIPT: &str = "aframe build";
pub const DEFAULT_SERVE_SCRIPT: &str = "aframe serve";
pub const DEFAULT_DEPLOY_SCRIPT: &str = "aframe deploy";

/// Project manifest with the keys the CLI reads and rewrites.
/// Unknown keys round-trip through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub scripts: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub aframe: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Path of the manifest inside a project directory
    pub fn path(project_dir: &Utf8Path) -> Utf8PathBuf {
        project_dir.join(MANIFEST_FILE)
    }

    /// Load the manifest from a project directory
    pub fn load(project_dir: &Utf8Path) -> Result<Self> {
        let path = Self::path(project_dir);
        let text =
            std::fs::read_to_string(&path).map_err(|_| Error::manifest_read(path.as_str()))?;
        let manifest = serde_json::from_str(&text)?;
        Ok(manifest)
    }

    /// Load the manifest, synthesizing an empty one when absent or invalid.
    ///
    /// Build, serve, and deploy must proceed for template layouts that
    /// ship no manifest at all.
    pub fn load_or_default(project_dir: &Utf8Path) -> Self {
        match Self::load(project_dir) {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("No usable manifest in {}: {}", project_dir, e);
                Self::default()
            }
        }
    }

    /// Write the manifest back to a project directory
    pub fn save(&self, project_dir: &Utf8Path) -> Result<()> {
        let path = Self::path(project_dir);
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        std::fs::write(&path, text)?;
        Ok(())
    }

    /// Get a script entry as a string
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).and_then(Value::as_str)
    }

    /// Get a script entry only when it differs from the tool's default
    /// invocation for that command.
    pub fn custom_script(&self, name: &str) -> Option<&str> {
        let default = match name {
            "build" => DEFAULT_BUILD_SCRIPT,
            "serve" => DEFAULT_SERVE_SCRIPT,
            "deploy" => DEFAULT_DEPLOY_SCRIPT,
            _ => return self.script(name),
        };
        self.script(name).filter(|s| s.trim() != default)
    }

    /// Rewrite the manifest for a freshly created project: the project
    /// takes the target directory's basename as its name, the version is
    /// reset, and the template's identity is recorded as lineage under
    /// `aframe.basedOn`.
    pub fn rewrite_for_project(&mut self, project_name: &str, author: Option<&str>) {
        let template_name = self.name.clone().unwrap_or_default();
        let template_version = self.version.clone().unwrap_or_default();

        if !self.aframe.is_object() {
            self.aframe = json!({});
        }
        if let Some(aframe) = self.aframe.as_object_mut() {
            if !template_name.is_empty() {
                if let Some(based_on) = aframe
                    .entry("basedOn")
                    .or_insert_with(|| json!({}))
                    .as_object_mut()
                {
                    based_on.insert(template_name.clone(), Value::String(template_version));
                }
            }

            let mut keywords: Vec<String> = aframe
                .get("keywords")
                .and_then(Value::as_array)
                .map(|a| {
                    a.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            for kw in [
                project_name,
                "aframe",
                "aframe-scene",
                template_name.as_str(),
                "webvr",
                "vr",
            ] {
                if !kw.is_empty() && !keywords.iter().any(|k| k == kw) {
                    keywords.push(kw.to_string());
                }
            }
            aframe.insert("keywords".to_string(), json!(keywords));
        }

        self.name = Some(project_name.to_string());
        self.version = Some("0.0.0".to_string());
        self.private = Some(true);

        if let Some(author) = author {
            self.extra
                .entry("author".to_string())
                .or_insert_with(|| Value::String(author.to_string()));
        }
    }
}

/// Deep-merge `data` into the JSON file at `path`, tolerating a missing
/// or unparseable file (the merge then starts from an empty object).
pub fn merge_manifest_file(path: &Utf8Path, data: &Value) -> Result<()> {
    let mut manifest: Value = std::fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_else(|| json!({}));

    deep_merge(&mut manifest, data);

    let mut text = serde_json::to_string_pretty(&manifest)?;
    text.push('\n');
    std::fs::write(path, text)?;
    debug!("Updated manifest {}", path);
    Ok(())
}

/// Recursively merge JSON objects; arrays are concatenated, scalars in
/// `patch` win.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, patch_value),
                    None => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (Value::Array(base_arr), Value::Array(patch_arr)) => {
            base_arr.extend(patch_arr.iter().cloned());
        }
        (base_slot, patch_value) => {
            *base_slot = patch_value.clone();
        }
    }
}

/// Read the global git author (`user.name <user.email>`), if configured.
/// Best-effort: a missing git binary or unset config yields `None`.
pub async fn global_git_author() -> Option<String> {
    let read = |key: &'static str| async move {
        let output = tokio::process::Command::new("git")
            .args(["config", "--global", key])
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    };

    let name = read("user.name").await?;
    match read("user.email").await {
        Some(email) => Some(format!("{} <{}>", name, email)),
        None => {
            warn!("Git user.email not set; using user.name only");
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    fn write_manifest(dir: &Utf8Path, json: &str) {
        std::fs::write(dir.join(MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn test_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        write_manifest(
            dir,
            r#"{"name":"aframe-default-template","version":"1.2.0","scripts":{"build":"aframe build"},"license":"MIT"}"#,
        );

        let manifest = Manifest::load(dir).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("aframe-default-template"));
        assert_eq!(manifest.script("build"), Some("aframe build"));
        assert_eq!(
            manifest.extra.get("license").and_then(Value::as_str),
            Some("MIT")
        );

        manifest.save(dir).unwrap();
        let reloaded = Manifest::load(dir).unwrap();
        assert_eq!(reloaded.version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_load_or_default_when_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let manifest = Manifest::load_or_default(dir);
        assert!(manifest.name.is_none());
        assert!(manifest.scripts.is_empty());
    }

    #[test]
    fn test_custom_script_ignores_default_invocation() {
        let mut manifest = Manifest::default();
        manifest
            .scripts
            .insert("build".into(), Value::String("aframe build".into()));
        assert_eq!(manifest.custom_script("build"), None);

        manifest
            .scripts
            .insert("build".into(), Value::String("webpack --mode production".into()));
        assert_eq!(
            manifest.custom_script("build"),
            Some("webpack --mode production")
        );
    }

    #[test]
    fn test_rewrite_for_project() {
        let mut manifest = Manifest {
            name: Some("aframe-default-template".into()),
            version: Some("1.2.0".into()),
            ..Default::default()
        };

        manifest.rewrite_for_project("my-scene", Some("Ada <ada@example.com>"));

        assert_eq!(manifest.name.as_deref(), Some("my-scene"));
        assert_eq!(manifest.version.as_deref(), Some("0.0.0"));
        assert_eq!(manifest.private, Some(true));
        assert_eq!(
            manifest.aframe["basedOn"]["aframe-default-template"],
            "1.2.0"
        );
        let keywords = manifest.aframe["keywords"].as_array().unwrap();
        assert!(keywords.iter().any(|k| k == "my-scene"));
        assert!(keywords.iter().any(|k| k == "webvr"));
        assert_eq!(manifest.extra["author"], "Ada <ada@example.com>");
    }

    #[test]
    fn test_merge_manifest_file_deep() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let path = dir.join(MANIFEST_FILE);
        std::fs::write(
            &path,
            r#"{"name":"scene","aframe":{"uploads":[{"src":"a.mp4"}]}}"#,
        )
        .unwrap();

        merge_manifest_file(
            &path,
            &serde_json::json!({"aframe": {"uploads": [{"src": "b.mp4", "type": "video/mp4"}]}}),
        )
        .unwrap();

        let merged: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(merged["name"], "scene");
        let uploads = merged["aframe"]["uploads"].as_array().unwrap();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[1]["type"], "video/mp4");
    }

    #[test]
    fn test_merge_manifest_file_tolerates_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let path = dir.join(MANIFEST_FILE);

        merge_manifest_file(&path, &serde_json::json!({"name": "fresh"})).unwrap();

        let merged: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(merged["name"], "fresh");
    }
}
