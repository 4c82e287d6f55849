//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Commands;

/// Command-line interface for controlling a project's application server.
#[derive(Parser)]
#[command(name = "harbor")]
#[command(about = "Render, start, signal and script an application server")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub flags: GlobalFlags,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags accepted before or after any command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct GlobalFlags {
    /// Keep full remote error messages and stack traces
    #[arg(long, global = true)]
    pub trace: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, env = "HARBOR_PROJECT", value_name = "DIR")]
    pub project: Option<PathBuf>,
}
