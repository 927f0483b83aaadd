//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to the build
//! command implementation.

mod build;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// felib-build - Compile single-file UI components into a named felib
#[derive(Parser, Debug)]
#[command(name = "felib-build")]
#[command(about = "Compile single-file UI components into a named felib (js.txt / css.txt)")]
#[command(version)]
pub struct Cli {
    /// Name of the felib to build (output goes to <out>/<TARGET>)
    pub target: Option<String>,

    /// Run the configured upload command after a successful build (any value)
    pub upload: Option<String>,

    /// Path to felib.toml (default: search upward from the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the component source base directory
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Override the output base directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Number of parallel compiles (0 = available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Stop starting new compiles after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// List the components that would be compiled without building anything
    #[arg(long)]
    pub dry_run: bool,

    /// Keep running and recompile components when their sources change
    #[arg(long)]
    pub watch: bool,

    /// Report progress as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Show per-component and manifest progress
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse command-line arguments and run the build.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    build::run_build(&cli)
}
