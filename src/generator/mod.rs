//! Site generation: page entries + database -> deliverables.
//!
//! Runs in three phases, each finishing before the next starts:
//!
//! 1. **Routes**: validate every entry into a [`PageSpec`] (declaration
//!    order) and register them in a [`RouteTable`].
//! 2. **Redirects**: resolve every redirect target.
//! 3. **Expansion**: turn every endpoint into a [`Deliverable`], optionally
//!    in parallel.
//!
//! Phases 1 and 2 raise every configuration error, so a render error always
//! means the configuration is sound.
//!
//! [`Deliverable`]: crate::site::Deliverable

mod endpoint;
mod error;
mod redirect;

use rayon::prelude::*;

use crate::core::JsonMap;
use crate::database::Database;
use crate::debug;
use crate::logger::ProgressLine;
use crate::page::{PageEntry, PageSpec};
use crate::render::Render;
use crate::route::RouteTable;
use crate::site::Site;
use crate::utils::plural_count;

use endpoint::{Expander, Job};
pub use error::GenerateError;
pub use redirect::{RedirectTargets, resolve_all as resolve_redirects};

/// Settings of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Scheme and host, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Prefix of every href, e.g. `/2017/my-project`. May be empty.
    pub base_href: String,
    /// Expand endpoints with rayon.
    pub parallel: bool,
    /// Show a progress line while expanding.
    pub progress: bool,
}

/// Phase 1: validate all entries and register them.
pub fn build_routes<'db>(
    options: &GenerateOptions,
    database: Option<&'db Database>,
    entries: &[PageEntry],
) -> Result<RouteTable<'db>, GenerateError> {
    let specs = entries
        .iter()
        .map(|entry| PageSpec::new(&options.base_href, database, entry))
        .collect::<Result<Vec<_>, _>>()?;
    let routes = RouteTable::new(options.base_url.clone(), specs)?;

    debug!(
        "routes";
        "{} -> {}",
        plural_count(routes.specs().len(), "page spec"),
        plural_count(routes.endpoint_count(), "endpoint")
    );
    Ok(routes)
}

/// Run all three phases.
pub fn generate(
    options: &GenerateOptions,
    database: Option<&Database>,
    entries: &[PageEntry],
    globals: &JsonMap,
    renderer: &dyn Render,
) -> Result<Site, GenerateError> {
    let routes = build_routes(options, database, entries)?;
    let locations = resolve_redirects(&routes)?;
    expand(options, &routes, &locations, globals, renderer)
}

/// Phase 3. Output order is declaration order, parallel or not.
fn expand(
    options: &GenerateOptions,
    routes: &RouteTable<'_>,
    locations: &RedirectTargets,
    globals: &JsonMap,
    renderer: &dyn Render,
) -> Result<Site, GenerateError> {
    let jobs: Vec<Job<'_, '_>> = routes
        .specs()
        .iter()
        .zip(locations)
        .flat_map(|(spec, locations)| {
            spec.endpoints()
                .iter()
                .enumerate()
                .map(move |(index, endpoint)| Job {
                    spec,
                    endpoint,
                    location: locations.get(index).map(String::as_str),
                })
        })
        .collect();

    let progress = options
        .progress
        .then(|| ProgressLine::new("build", &count_kinds(&jobs)));
    let expander = Expander {
        routes,
        globals,
        renderer,
        progress: progress.as_ref(),
    };

    let deliverables: Result<Vec<_>, _> = if options.parallel {
        jobs.par_iter().map(|job| expander.expand(job)).collect()
    } else {
        jobs.iter().map(|job| expander.expand(job)).collect()
    };

    // On failure the progress line is dropped, which clears it.
    let deliverables = deliverables?;
    if let Some(progress) = progress {
        progress.finish();
    }

    Ok(Site::new(deliverables))
}

fn count_kinds(jobs: &[Job<'_, '_>]) -> [(&'static str, usize); 3] {
    let mut counts = [("page", 0), ("blob", 0), ("redirect", 0)];
    for job in jobs {
        let name = job.spec.kind().name();
        if let Some((_, n)) = counts.iter_mut().find(|(kind, _)| *kind == name) {
            *n += 1;
        }
    }
    counts
}
