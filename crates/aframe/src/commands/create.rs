//! `aframe create` command handler

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use aframe_core::{TemplateRegistry, DEFAULT_TEMPLATE};
use aframe_scaffold::{create_project, CreateOptions};

use crate::cli::CreateArgs;
use crate::output;

pub async fn run(args: CreateArgs) -> Result<()> {
    output::header("Create A-Frame Scene");

    let registry = TemplateRegistry::embedded().context("Could not load template registry")?;
    let template_input = args
        .template
        .clone()
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
    let source = registry.resolve(&template_input)?;

    let target = match (&args.directory, &args.name) {
        (Some(dir), _) => dir.clone(),
        (None, Some(name)) => Utf8PathBuf::from(name),
        (None, None) => Utf8PathBuf::from("."),
    };

    output::kv("Template", source.describe());
    output::kv("Location", target.as_str());
    println!();

    let options = CreateOptions {
        force: args.force,
        install_deps: !args.no_install,
        git_init: !args.no_git,
        github: args.github.clone(),
        clipboard: !args.no_clipboard,
        open_browser: !args.no_open,
    };

    let spinner = output::spinner("Scaffolding project...");
    let report = create_project(&source, &target, &options).await;
    spinner.finish_and_clear();
    let report = report?;

    output::success(&format!(
        "Created \"{}\" at {}",
        report.project_name, report.project_dir
    ));
    if let Some(url) = &report.github_url {
        output::kv("Repository", url);
    }

    output::header("Next steps");
    output::info(&format!("cd {}", report.project_dir));
    output::info("aframe serve");
    Ok(())
}
