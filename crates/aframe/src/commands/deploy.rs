//! `aframe deploy` command handler
//!
//! Pipeline: build, locate the output, publish through the chosen
//! provider, then submit the deployed URL to the A-Frame Index. A failed
//! build falls back to publishing the raw project directory so static
//! templates without a bundler still deploy.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};

use aframe_core::types::{DeployOptions, Provider};
use aframe_core::Manifest;
use aframe_deploy::{create_provider, submit, DeployContext};

use crate::cli::DeployArgs;
use crate::output;
use crate::utils::resolve_project_dir;

pub async fn run(args: DeployArgs) -> Result<()> {
    let project_dir = resolve_project_dir(args.directory.as_deref())?;

    let manifest = Manifest::load_or_default(&project_dir);
    if let Some(script) = manifest.custom_script("deploy") {
        output::info(&format!("Using deploy script from manifest: {script}"));
        aframe_core::utils::run_script(&project_dir, script).await?;
        return Ok(());
    }

    let provider_kind: Provider = args.provider.parse()?;
    let options = DeployOptions {
        provider: provider_kind,
        repo: args.repo.clone(),
        cdn_bin: args.cdn_bin.clone(),
        no_submit: args.no_submit,
        no_clipboard: args.no_clipboard,
        no_open: args.no_open,
        build: args.bundler.to_options(),
        ..Default::default()
    };

    output::header("Deploy A-Frame Scene");
    output::kv("Project", project_dir.as_str());
    output::kv("Provider", provider_kind.as_str());
    println!();

    let src_dir = build_step(&project_dir, &options).await;
    let context = locate_output(&project_dir, src_dir, options.clone());

    let provider = create_provider(provider_kind, &context.options);
    provider.check_prerequisites()?;

    let spinner = output::spinner(&format!("Publishing via {}...", provider.name()));
    let published = provider.publish(&context).await;
    spinner.finish_and_clear();
    let site_url = published?;
    output::success(&format!("Deployed: {site_url}"));

    let final_url = if options.no_submit {
        site_url.clone()
    } else {
        let works_url = submit::submit_to_index(&site_url, options.submit_timeout).await?;
        output::kv("Index entry", &works_url);
        works_url
    };

    if !options.no_clipboard {
        aframe_core::utils::copy_to_clipboard(&final_url);
    }
    if !options.no_open {
        aframe_core::utils::open_in_browser(&site_url);
    }
    Ok(())
}

/// Run the build; on failure, deploy the raw project tree instead
async fn build_step(project_dir: &Utf8Path, options: &DeployOptions) -> Utf8PathBuf {
    match aframe_core::build_project(project_dir, &options.build).await {
        Ok(report) if report.output_dir.is_dir() => report.output_dir,
        Ok(report) => {
            output::warning(&format!(
                "No build output at {}; deploying the project directory",
                report.output_dir
            ));
            project_dir.to_owned()
        }
        Err(e) => {
            output::warning(&format!(
                "Build failed ({e}); deploying the project directory"
            ));
            project_dir.to_owned()
        }
    }
}

/// Assemble the deploy context around the directory going live
fn locate_output(
    project_dir: &Utf8Path,
    src_dir: Utf8PathBuf,
    options: DeployOptions,
) -> DeployContext {
    // The manifest may live next to the output or only at the project
    // root; an absent manifest deploys as an anonymous scene.
    let manifest = if Manifest::path(&src_dir).exists() {
        Manifest::load_or_default(&src_dir)
    } else {
        Manifest::load_or_default(project_dir)
    };

    let root_dir = project_dir
        .file_name()
        .unwrap_or("scene")
        .to_string();

    DeployContext {
        project_dir: project_dir.to_owned(),
        src_dir,
        root_dir,
        manifest,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    #[test]
    fn test_locate_output_prefers_output_manifest() {
        let tmp = TempDir::new().unwrap();
        let project = Utf8Path::from_path(tmp.path()).unwrap();
        let out = project.join(".public");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(project.join("package.json"), r#"{"name":"root"}"#).unwrap();
        std::fs::write(out.join("package.json"), r#"{"name":"built"}"#).unwrap();

        let ctx = locate_output(project, out.clone(), DeployOptions::default());
        assert_eq!(ctx.manifest.name.as_deref(), Some("built"));
        assert_eq!(ctx.src_dir, out);
    }

    #[test]
    fn test_locate_output_falls_back_to_project_manifest() {
        let tmp = TempDir::new().unwrap();
        let project = Utf8Path::from_path(tmp.path()).unwrap();
        let out = project.join(".public");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(project.join("package.json"), r#"{"name":"root"}"#).unwrap();

        let ctx = locate_output(project, out, DeployOptions::default());
        assert_eq!(ctx.manifest.name.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn test_build_step_falls_back_on_build_failure() {
        let tmp = TempDir::new().unwrap();
        let project = Utf8Path::from_path(tmp.path()).unwrap();
        std::fs::write(
            project.join("package.json"),
            r#"{"name":"scene","scripts":{"build":"exit 1"}}"#,
        )
        .unwrap();

        let dir = build_step(project, &DeployOptions::default()).await;
        assert_eq!(dir, project);
    }

    #[tokio::test]
    async fn test_build_step_falls_back_when_output_missing() {
        let tmp = TempDir::new().unwrap();
        let project = Utf8Path::from_path(tmp.path()).unwrap();
        // Build "succeeds" without producing the output directory.
        std::fs::write(
            project.join("package.json"),
            r#"{"name":"scene","scripts":{"build":"true"}}"#,
        )
        .unwrap();

        let dir = build_step(project, &DeployOptions::default()).await;
        assert_eq!(dir, project);
    }

    #[test]
    fn test_root_dir_is_project_basename() {
        let tmp = TempDir::new().unwrap();
        let project = Utf8Path::from_path(tmp.path()).unwrap();
        let ctx = locate_output(project, project.to_owned(), DeployOptions::default());
        assert_eq!(ctx.root_dir, project.file_name().unwrap());
    }
}
