//! `aframe build` command handler

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::output;
use crate::utils::resolve_project_dir;

pub async fn run(args: BuildArgs) -> Result<()> {
    let project_dir = resolve_project_dir(args.directory.as_deref())?;
    let options = args.bundler.to_options();

    let spinner = output::spinner(&format!("Building {}...", project_dir));
    let report = aframe_core::build_project(&project_dir, &options).await;
    spinner.finish_and_clear();

    let report = report?;
    if report.output_dir.is_dir() {
        output::success(&format!("Built to {}", report.output_dir));
    } else {
        output::warning(&format!(
            "Build finished but produced no output at {}",
            report.output_dir
        ));
    }
    Ok(())
}
