//! Playground generator - build a multi-page demo playground
//!
//! Turns a directory of annotated example files into one HTML page and one
//! entry module per example, plus a category-grouped navigation manifest,
//! and declares the dev-server configuration the bundler runs with.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;

// Re-export main types
pub use bundler::BundlerConfig;
pub use config::{CliOverrides, Config, PlaygroundConfig};
pub use discovery::{extract, ExampleRecord, ExampleScanner, Metadata};
pub use error::{Error, Result};
pub use output::{
    render, Generation, GenerationReport, Manifest, ManifestEntry, PlaygroundGenerator, Template,
    Workspace,
};
