//! felib-build - Library for compiling single-file UI components into felibs
//!
//! This library provides functionality to:
//! - Discover component sources and derive their names
//! - Compile each component through an external bundler in parallel
//! - Maintain the `js.txt` / `css.txt` manifests of a felib target
//! - Watch the source tree and recompile changed components

pub mod build;
pub mod cli;
pub mod config;
pub mod watch;
