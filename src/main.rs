//! felib-build - Command-line tool for compiling UI components into felibs

use std::process::ExitCode;

use felib_build::cli;

fn main() -> ExitCode {
    cli::run()
}
