//! `pagegen routes`: print the route table without rendering.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use crate::{
    cli::common::load_database,
    config::SiteConfig,
    generator::{build_routes, resolve_redirects},
    log,
    page::{PageKind, PageSpec},
    route::RouteTable,
    utils::plural_count,
};

/// Print every declared path with its kind and URLs.
///
/// Redirects are resolved too, so a bad redirect fails here as it would in
/// `build`.
pub fn list_routes(config: &SiteConfig) -> Result<()> {
    let database = load_database(config)?;
    let routes = build_routes(&config.to_options(false), database.as_ref(), &config.pages)?;
    let locations = resolve_redirects(&routes)?;

    for line in route_lines(&routes, &locations, crate::logger::is_verbose()) {
        println!("{line}");
    }

    log!(
        "routes";
        "{} -> {}",
        plural_count(routes.specs().len(), "path"),
        plural_count(routes.endpoint_count(), "endpoint")
    );
    Ok(())
}

/// One header line per spec, then one indented line per endpoint.
///
/// Headers are styled only when stdout supports color and `--color` allows it.
fn route_lines(routes: &RouteTable<'_>, locations: &[Vec<String>], verbose: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(routes.endpoint_count() + routes.specs().len());

    for (spec, targets) in routes.specs().iter().zip(locations) {
        let kind = format!("({})", describe(spec));
        lines.push(format!(
            "{} {}",
            spec.path().if_supports_color(Stream::Stdout, |t| t.bold()),
            kind.if_supports_color(Stream::Stdout, |t| t.dimmed())
        ));
        for (index, endpoint) in spec.endpoints().iter().enumerate() {
            match targets.get(index).filter(|_| verbose) {
                Some(target) => lines.push(format!("  {} -> {}", endpoint.url, target)),
                None => lines.push(format!("  {}", endpoint.url)),
            }
        }
    }

    lines
}

fn describe(spec: &PageSpec<'_>) -> String {
    let kind = match spec.kind() {
        PageKind::Page { template } => format!("page {template}"),
        PageKind::Blob { field } => format!("blob {field}"),
        PageKind::Redirect { .. } => "redirect".to_string(),
    };
    match spec.binding().key() {
        Some(key) => format!("{kind}, {key}"),
        None => kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::generator::GenerateOptions;
    use crate::page::PageEntry;
    use serde_json::json;

    #[test]
    fn test_route_lines() {
        owo_colors::set_override(false);

        let db = Database::from_value(json!({
            "friends": [{ "permalink": "bill" }, { "permalink": "ted" }]
        }))
        .unwrap();
        let entries = [
            PageEntry::new("simple"),
            PageEntry {
                template: Some("friend".into()),
                collection: Some("friends".into()),
                ..PageEntry::new("friends/:permalink")
            },
            PageEntry {
                redirect: Some("simple".into()),
                ..PageEntry::new("_root")
            },
        ];
        let options = GenerateOptions {
            base_url: "http://localhost:3000".into(),
            base_href: "/p".into(),
            ..Default::default()
        };
        let routes = build_routes(&options, Some(&db), &entries).unwrap();
        let locations = resolve_redirects(&routes).unwrap();

        assert_eq!(
            route_lines(&routes, &locations, true),
            [
                "simple (page simple)",
                "  /p/simple",
                "friends/:permalink (page friend, friends)",
                "  /p/friends/bill",
                "  /p/friends/ted",
                "_root (redirect)",
                "  /p -> /p/simple",
            ]
        );
        assert_eq!(route_lines(&routes, &locations, false)[6], "  /p");
    }
}
