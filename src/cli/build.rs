//! `pagegen build`: generate the site and write the artifact.
//!
//! Phases:
//! - **Load** - database and template directory
//! - **Generate** - route table, redirect pass, endpoint expansion
//! - **Write** - `manifest.json` and `objects/` under the output directory

use std::time::Instant;

use anyhow::{Context, Result};

use crate::{
    cli::common::load_database,
    config::SiteConfig,
    generator::generate,
    log,
    render::TemplateDir,
    site::Site,
    utils::plural_count,
};

/// Build the entire site. `quiet` hides the progress line and summary.
pub fn build_site(config: &SiteConfig, quiet: bool) -> Result<Site> {
    let started = Instant::now();

    let database = load_database(config)?;
    let templates = TemplateDir::new(&config.build.templates);
    let options = config.to_options(!quiet);

    let site = generate(
        &options,
        database.as_ref(),
        &config.pages,
        &config.globals,
        &templates,
    )?;

    let objects = site
        .write_to(&config.build.output)
        .with_context(|| format!("failed to write {}", config.build.output.display()))?;

    if !quiet {
        log!(
            "build";
            "{} ({}) in {:.2?} -> {}",
            plural_count(site.len(), "endpoint"),
            plural_count(objects, "object"),
            started.elapsed(),
            config.build.output.display()
        );
    }

    Ok(site)
}
