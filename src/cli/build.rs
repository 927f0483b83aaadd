//! Build command implementation

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use super::{Cli, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::progress::{ConsoleProgress, JsonProgress, ProgressEvent, ProgressReporter};
use crate::build::{
    run_upload, BuildContext, BuildPipeline, ComponentOutputs, ProcessCompiler, UploadError,
};
use crate::config::loader::{
    default_config, find_config, load_config, merge_cli_overrides, CliOverrides,
};
use crate::config::FelibConfig;

/// Run the build command
pub fn run_build(cli: &Cli) -> ExitCode {
    // Nothing may be created without a target.
    let Some(target) = cli.target.as_deref() else {
        eprintln!("please provide a name for the felib to use");
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let (mut config, project_root) = match resolve_config(cli.config.as_deref(), cli.verbose) {
        Ok(found) => found,
        Err(code) => return code,
    };

    let overrides = CliOverrides {
        src: cli.src.clone(),
        out: cli.out.clone(),
        jobs: cli.jobs,
        fail_fast: cli.fail_fast.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);

    let context = match BuildContext::new(config, project_root, target) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    // Check source directory exists
    let src_dir = context.src_dir();
    if !src_dir.is_dir() {
        eprintln!("Error: Source directory not found: {}", src_dir.display());
        eprintln!("Create the directory or specify a different path with --src");
        return ExitCode::from(EXIT_ERROR);
    }

    let reporter: Arc<dyn ProgressReporter> = if cli.json {
        Arc::new(JsonProgress::new())
    } else {
        Arc::new(
            ConsoleProgress::new()
                .with_colors(std::io::stderr().is_terminal())
                .with_verbose(cli.verbose),
        )
    };

    let compiler = Arc::new(ProcessCompiler::new(
        &context.config().compiler,
        context.project_root().to_path_buf(),
    ));
    let watch_config = context.config().watch.clone();
    let pipeline = BuildPipeline::new(context, compiler)
        .with_reporter(Arc::clone(&reporter))
        .with_dry_run(cli.dry_run);

    if cli.dry_run {
        return run_dry(&pipeline);
    }

    let result = match pipeline.build() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Build error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if cli.upload.is_some() {
        if result.is_success() {
            match run_upload(pipeline.context()) {
                Ok(()) => reporter.report(ProgressEvent::Info {
                    message: format!("uploaded felib {}", pipeline.context().target()),
                }),
                Err(UploadError::NotConfigured) => reporter.report(ProgressEvent::Warning {
                    component_id: None,
                    message: UploadError::NotConfigured.to_string(),
                }),
                Err(e) => {
                    reporter.report(ProgressEvent::Error { component_id: None, message: e.to_string() });
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        } else {
            reporter.report(ProgressEvent::Warning {
                component_id: None,
                message: "skipping upload because the build failed".to_string(),
            });
        }
    }

    if cli.watch {
        println!("Press Ctrl+C to stop");
        return match crate::watch::watch_and_rebuild(&pipeline, &watch_config) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Watch error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    if result.is_success() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Load felib.toml from `--config` or by searching upward, else defaults.
///
/// The project root is the directory holding the config file, or the
/// working directory when defaults are used.
fn resolve_config(
    explicit: Option<&Path>,
    verbose: bool,
) -> Result<(FelibConfig, PathBuf), ExitCode> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let config_path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };

    let Some(config_path) = config_path else {
        if verbose {
            println!("No felib.toml found, using defaults");
        }
        return Ok((default_config(), cwd));
    };

    if verbose {
        println!("Using config: {}", config_path.display());
    }
    let config = load_config(Some(&config_path)).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd,
    };
    Ok((config, root))
}

/// Print what a build would compile, then report every component skipped.
fn run_dry(pipeline: &BuildPipeline) -> ExitCode {
    let ctx = pipeline.context();
    println!("Dry run - would build felib '{}':", ctx.target());
    println!("  Source: {}", ctx.src_dir().display());
    println!("  Output: {}", ctx.target_dir().display());

    let sources = match pipeline.discover() {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("  Error discovering components: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    println!("  Components: {}", sources.len());
    for source in &sources {
        match &source.name {
            Ok(name) => {
                let outputs = ComponentOutputs::for_component(ctx, name);
                println!("    - {} ({})", name.id, name.module_name());
                println!("        {}", outputs.script.display());
                println!("        {}", outputs.style.display());
            }
            Err(e) => println!("    - {}: {}", source.display_id(), e),
        }
    }

    let result = pipeline.compile_sources(&sources);
    if result.is_success() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
