//! `pagegen url`: look up one URL by declared path, or the reverse.

use anyhow::{Result, anyhow};

use crate::{
    cli::common::load_database, config::SiteConfig, generator::build_routes, route::RouteTable,
};

pub fn print_url(
    config: &SiteConfig,
    path: &str,
    params: &[String],
    absolute: bool,
    reverse: bool,
) -> Result<()> {
    let database = load_database(config)?;
    let routes = build_routes(&config.to_options(false), database.as_ref(), &config.pages)?;
    let line = if reverse {
        reverse_lookup(&routes, path)?.to_string()
    } else {
        lookup(&routes, path, params, absolute)?
    };
    println!("{line}");
    Ok(())
}

fn lookup(routes: &RouteTable<'_>, path: &str, params: &[String], absolute: bool) -> Result<String> {
    let url = if absolute {
        routes.absolute_url_for(path, params)?
    } else {
        routes.url_for(path, params)?.to_string()
    };
    Ok(url)
}

/// Accepts an href or an absolute URL under `site.base_url`.
fn reverse_lookup<'a>(routes: &'a RouteTable<'_>, url: &str) -> Result<&'a str> {
    let href = url.strip_prefix(routes.base_url()).unwrap_or(url);
    routes
        .path_for_url(href)
        .ok_or_else(|| anyhow!("no declared path generates `{url}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::generator::GenerateOptions;
    use crate::page::PageEntry;
    use serde_json::json;

    fn routes(db: &Database) -> RouteTable<'_> {
        let entries = [
            PageEntry {
                collection: Some("friends".into()),
                ..PageEntry::new("friends/:permalink")
            },
            PageEntry {
                collection: Some("friends".into()),
                redirect: Some("friends/:permalink".into()),
                ..PageEntry::new("friends/:permalink/")
            },
        ];
        let options = GenerateOptions {
            base_url: "http://localhost:3000".into(),
            base_href: "/2017/my-project".into(),
            ..Default::default()
        };
        build_routes(&options, Some(db), &entries).unwrap()
    }

    #[test]
    fn test_lookup() {
        let db = Database::from_value(json!({ "friends": [{ "permalink": "bill" }] })).unwrap();
        let routes = routes(&db);
        let params = ["bill".to_string()];

        assert_eq!(
            lookup(&routes, "friends/:permalink", &params, false).unwrap(),
            "/2017/my-project/friends/bill"
        );
        assert_eq!(
            lookup(&routes, "friends/:permalink", &params, true).unwrap(),
            "http://localhost:3000/2017/my-project/friends/bill"
        );
        assert!(lookup(&routes, "friends/:permalink", &[], false).is_err());
        assert!(lookup(&routes, "nope", &[], false).is_err());
    }

    #[test]
    fn test_reverse_lookup() {
        let db = Database::from_value(json!({ "friends": [{ "permalink": "bill" }] })).unwrap();
        let routes = routes(&db);

        assert_eq!(
            reverse_lookup(&routes, "/2017/my-project/friends/bill").unwrap(),
            "friends/:permalink"
        );
        assert_eq!(
            reverse_lookup(&routes, "http://localhost:3000/2017/my-project/friends/bill/").unwrap(),
            "friends/:permalink/"
        );
        assert!(reverse_lookup(&routes, "/2017/my-project/friends/ted").is_err());
    }
}
