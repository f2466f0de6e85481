//! pagegen - resolve page specs into a collision-free set of site endpoints.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod database;
mod embed;
mod generator;
mod logger;
mod page;
mod render;
mod route;
mod site;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&config, false).map(|_| ()),
        Commands::Routes { .. } => cli::routes::list_routes(&config),
        Commands::Url {
            path,
            params,
            absolute,
            reverse,
        } => cli::url::print_url(&config, path, params, *absolute, *reverse),
    }
}
