//! Build pipeline module for felib-build
//!
//! Compiles every component source of a project into a named felib target:
//! one script bundle and one stylesheet per component, plus the `js.txt` and
//! `css.txt` manifests listing them.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Recursively scan the source base for component files
//! - **Naming**: Derive identifier, file stem and module name from the path
//! - **Compilation**: Run the external compiler for each component in parallel
//! - **Manifests**: Regenerate `js.txt` / `css.txt` after each successful compile
//!
//! # Example
//!
//! ```ignore
//! use felib_build::build::{BuildContext, BuildPipeline, ProcessCompiler};
//! use felib_build::config::loader::load_config;
//! use std::sync::Arc;
//!
//! let config = load_config(None)?;
//! let compiler = Arc::new(ProcessCompiler::new(&config.compiler, project_root.clone()));
//! let context = BuildContext::new(config, project_root, "admin")?;
//! let pipeline = BuildPipeline::new(context, compiler);
//!
//! let result = pipeline.build()?;
//! println!("{}", result.summary());
//! ```

pub mod compiler;
pub mod component;
pub mod context;
pub mod manifest;
pub mod naming;
pub mod parallel;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod result;
pub mod scanner;
pub mod upload;

pub use compiler::*;
pub use component::*;
pub use context::*;
pub use manifest::*;
pub use naming::*;
pub use parallel::*;
pub use pipeline::*;
pub use result::*;
pub use upload::*;
