//! Rebuild-on-change
//!
//! A notify watcher marks a shared dirty flag on any source change; a
//! single rebuild task debounces the flag, reruns the build, and bumps
//! the generation counter the reload script polls.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use aframe_core::types::BuildOptions;
use aframe_core::utils::is_skipped_dir;

use crate::error::Result;

const DEBOUNCE: Duration = Duration::from_millis(400);

/// Keeps the filesystem watcher and rebuild task alive for the lifetime
/// of the server.
pub struct RebuildHandle {
    _watcher: RecommendedWatcher,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for RebuildHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Whether a changed path should trigger a rebuild. Changes inside the
/// output directory and VCS/dependency directories are the build's own
/// noise.
fn is_relevant(path: &std::path::Path, output_dir: &Utf8Path) -> bool {
    if path.starts_with(output_dir.as_std_path()) {
        return false;
    }
    !path.components().any(|c| {
        matches!(c, std::path::Component::Normal(name)
            if is_skipped_dir(&name.to_string_lossy()))
    })
}

/// Watch a project directory and rebuild on change, bumping `generation`
/// after each completed build.
pub fn spawn_rebuild_loop(
    project_dir: &Utf8Path,
    output_dir: &Utf8Path,
    build_options: &BuildOptions,
    generation: Arc<AtomicU64>,
) -> Result<RebuildHandle> {
    let dirty = Arc::new(AtomicBool::new(false));

    let mut watcher = {
        let dirty = dirty.clone();
        let output_dir = output_dir.to_owned();
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if event.paths.iter().any(|p| is_relevant(p, &output_dir)) {
                    dirty.store(true, Ordering::SeqCst);
                }
            }
        })?
    };
    watcher.watch(project_dir.as_std_path(), RecursiveMode::Recursive)?;
    debug!("Watching {} for changes", project_dir);

    let task = {
        let project_dir: Utf8PathBuf = project_dir.to_owned();
        let build_options = build_options.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(DEBOUNCE).await;
                if !dirty.swap(false, Ordering::SeqCst) {
                    continue;
                }
                match aframe_core::build_project(&project_dir, &build_options).await {
                    Ok(_) => {
                        let generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
                        info!("Rebuilt (generation {})", generation);
                    }
                    Err(e) => warn!("Rebuild failed: {}", e),
                }
            }
        })
    };

    Ok(RebuildHandle {
        _watcher: watcher,
        task,
    })
}
