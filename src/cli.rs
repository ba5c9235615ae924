//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros. The
//! tool does one thing, so the surface is a flat flag set rather than
//! subcommands.

use clap::Parser;
use std::path::PathBuf;

use crate::runner::RunOptions;
use crate::ui::OutputMode;

/// Smpatch - applies upgrade patches to live ScoreMaster installations.
#[derive(Debug, Parser)]
#[command(name = "smpatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of the ScoreMaster root folder
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// File containing the patches
    #[arg(short, long, default_value = "smpatch.zip")]
    pub patch: PathBuf,

    /// Apply the patch regardless of version criteria
    #[arg(long)]
    pub force: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show nothing except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,

    /// Don't delete the patchfile on completion
    #[arg(long)]
    pub keep: bool,

    /// Apply without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode implied by the verbosity flags.
    pub fn output_mode(&self) -> OutputMode {
        if self.silent {
            OutputMode::Silent
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Run settings implied by the arguments. Silent runs never prompt, so
    /// silent implies yes.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            root: self.root.clone(),
            patch: self.patch.clone(),
            force: self.force,
            keep_package: self.keep,
            assume_yes: self.yes || self.silent,
        }
    }
}
