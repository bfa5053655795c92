//! CLI argument parsing

use crate::config::CliOverrides;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Generate a multi-page demo playground from annotated examples
#[derive(Parser, Debug)]
#[command(name = "playground-gen")]
#[command(about = "Generate a multi-page demo playground from annotated examples")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the playground workspace and manifest
    Generate {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print the bundler configuration as JSON
    Config {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Regenerate, then preview the workspace and its sources over HTTP (no transpiling)
    Serve {
        #[command(flatten)]
        paths: PathArgs,

        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Show version information
    Version,
}

/// Locations shared by `generate` and `serve`
#[derive(ClapArgs, Debug, Default)]
pub struct PathArgs {
    /// Directory holding the example files
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output workspace directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page template
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Example file extension
    #[arg(long)]
    pub ext: Option<String>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PathArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            source: self.source.clone(),
            output: self.output.clone(),
            template: self.template.clone(),
            extension: self.ext.clone(),
            ..Default::default()
        }
    }
}
