//! Configuration module for the felib build
//!
//! Provides types and parsing for `felib.toml` project configuration.

pub mod loader;
pub mod schema;

pub use schema::*;
