//! Watch mode for automatic recompiles on file changes
//!
//! Provides file system watching with debouncing for `felib-build <target> --watch`.
//! Only the sources in directories that changed are recompiled; artifacts
//! of deleted sources are left in place.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;

use crate::build::component::ComponentSource;
use crate::build::BuildPipeline;
use crate::config::schema::WatchConfig;

/// Error during watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Source directory not found
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Get current timestamp for logging
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400;
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Check if a changed path is a component source.
fn is_relevant_file(path: &Path, suffix: &str) -> bool {
    path.file_name().map(|name| name.to_string_lossy().ends_with(suffix)).unwrap_or(false)
}

/// Source directories (relative to `src_dir`) touched by changed paths.
///
/// Paths outside `src_dir` and paths not ending in `suffix` are dropped.
/// Removed files still count, since removing a source can rename the
/// sources left in its directory.
pub fn changed_directories(src_dir: &Path, suffix: &str, paths: &[PathBuf]) -> HashSet<PathBuf> {
    let canonical_src = src_dir.canonicalize().ok();

    paths
        .iter()
        .filter(|path| is_relevant_file(path, suffix))
        .filter_map(|path| {
            let relative = path
                .strip_prefix(src_dir)
                .ok()
                .or_else(|| canonical_src.as_deref().and_then(|src| path.strip_prefix(src).ok()))?;
            Some(relative.parent().map(Path::to_path_buf).unwrap_or_default())
        })
        .collect()
}

/// Keep the discovered sources that live in one of `dirs`.
///
/// Every source of a touched directory is recompiled, so siblings whose
/// names changed because a source was added or removed are rebuilt too.
pub fn affected_sources(
    discovered: Vec<ComponentSource>,
    dirs: &HashSet<PathBuf>,
) -> Vec<ComponentSource> {
    discovered
        .into_iter()
        .filter(|source| {
            let dir = source.relative.parent().map(Path::to_path_buf).unwrap_or_default();
            dirs.contains(&dir)
        })
        .collect()
}

fn event_paths(events: &[DebouncedEvent]) -> Vec<PathBuf> {
    events
        .iter()
        .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
        .map(|e| e.path.clone())
        .collect()
}

/// Watch the source base and recompile changed components.
///
/// The initial full build is expected to have run already. This function
/// blocks and runs until interrupted (Ctrl+C).
///
/// # Returns
/// * `Err(WatchError)` if watch setup fails or the event channel closes
pub fn watch_and_rebuild(pipeline: &BuildPipeline, config: &WatchConfig) -> Result<(), WatchError> {
    let ctx = pipeline.context();
    let src_dir = ctx.src_dir();
    if !src_dir.exists() {
        return Err(WatchError::SourceNotFound(src_dir));
    }

    let (tx, rx) = channel();
    let debounce_duration = Duration::from_millis(u64::from(config.debounce_ms));
    let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;
    debouncer.watcher().watch(&src_dir, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let dirs = changed_directories(&src_dir, ctx.source_suffix(), &event_paths(&events));
                if dirs.is_empty() {
                    continue;
                }
                let sources = match pipeline.discover() {
                    Ok(discovered) => affected_sources(discovered, &dirs),
                    Err(e) => {
                        eprintln!("[{}] {}", timestamp(), e);
                        continue;
                    }
                };
                if sources.is_empty() {
                    continue;
                }

                if config.clear_screen {
                    clear_screen();
                }
                for source in &sources {
                    println!("[{}] Changed: {}", timestamp(), source.relative.display());
                }

                // The output tree may have been removed while watching.
                if let Err(e) = pipeline.prepare_output_dirs() {
                    eprintln!("[{}] {}", timestamp(), e);
                    continue;
                }

                let result = pipeline.compile_sources(&sources);
                if !result.is_success() {
                    eprintln!("[{}] {} component(s) failed", timestamp(), result.failed_count());
                }
                println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());
            }
            Ok(Err(error)) => {
                // Watch error (non-fatal) - log but continue watching
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
                eprintln!("[{}] Continuing to watch...", timestamp());
            }
            Err(e) => {
                return Err(WatchError::ChannelError(e.to_string()));
            }
        }
    }
}
