//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Documentation link rewriting across repository stacks
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docstack.toml)
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "docstack.toml",
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve every link and write the HTML output
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Resolve every link and report diagnostics without writing
    #[command(visible_alias = "c")]
    Check {
        /// Check external links for reachability
        #[arg(long)]
        check_links: bool,

        /// Resolve branch-qualified URLs against checked-out branches
        #[arg(long)]
        git: bool,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory path (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Resolve branch-qualified URLs against checked-out branches
    #[arg(long)]
    pub git: bool,

    /// Check external links for reachability
    #[arg(long)]
    pub check_links: bool,

    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,
}
