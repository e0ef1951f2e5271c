//! docstack - link rewriting for documentation spread over many repositories.

#![allow(dead_code)]

mod address;
mod cli;
mod config;
mod context;
mod core;
mod document;
mod generator;
mod logger;
mod markdown;
mod pipeline;
mod repository;
mod utils;
mod world;

use anyhow::{Result, anyhow};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{DocstackConfig, find_config_file};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config_path = find_config_file(&cli.config)
        .ok_or_else(|| anyhow!("config file '{}' not found", cli.config.display()))?;
    let mut config = DocstackConfig::load(&config_path)?;

    match &cli.command {
        Commands::Build { build_args } => {
            config.apply_overrides(
                build_args.output.as_deref(),
                build_args.git,
                build_args.check_links,
                build_args.clean,
            );
            cli::build::build_stack(&config)
        }
        Commands::Check { check_links, git } => {
            config.apply_overrides(None, *git, *check_links, false);
            cli::check::check_stack(&config)
        }
    }
}
