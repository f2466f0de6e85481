//! Redirect target resolution.

use super::GenerateError;
use crate::database::ParamIssue;
use crate::page::{Endpoint, PageKind, PageSpec, RedirectTarget};
use crate::route::RouteTable;

/// Resolved `Location` of every redirect endpoint, aligned with
/// [`RouteTable::specs`] and each spec's endpoints. Non-redirect specs get
/// an empty list.
pub type RedirectTargets = Vec<Vec<String>>;

/// Resolve every redirect before anything renders.
pub fn resolve_all(routes: &RouteTable<'_>) -> Result<RedirectTargets, GenerateError> {
    routes
        .specs()
        .iter()
        .map(|spec| match spec.kind() {
            PageKind::Redirect { target } => spec
                .endpoints()
                .iter()
                .map(|endpoint| resolve(routes, spec, target, endpoint))
                .collect::<Result<Vec<_>, _>>(),
            _ => Ok(Vec::new()),
        })
        .collect()
}

/// `Location` for one redirect endpoint.
///
/// An absolute target is used verbatim. A path target is filled with values
/// read from the endpoint's own model, by the target's placeholder keys.
pub fn resolve(
    routes: &RouteTable<'_>,
    spec: &PageSpec<'_>,
    target: &RedirectTarget,
    endpoint: &Endpoint<'_>,
) -> Result<String, GenerateError> {
    let path = match target {
        RedirectTarget::Absolute(url) => return Ok(url.clone()),
        RedirectTarget::Path(path) => path,
    };

    let destination = routes
        .resolve_path(path)
        .map_err(|_| GenerateError::InvalidRedirect {
            path: spec.path().to_string(),
            target: path.clone(),
        })?;

    let params = destination
        .params_from(endpoint.model)
        .map_err(|(key, issue)| match issue {
            ParamIssue::Missing => GenerateError::RedirectMissingField {
                path: spec.path().to_string(),
                target: path.clone(),
                url: endpoint.url.to_string(),
                key: key.to_string(),
            },
            ParamIssue::Unsupported(found) => GenerateError::RedirectInvalidField {
                path: spec.path().to_string(),
                target: path.clone(),
                url: endpoint.url.to_string(),
                key: key.to_string(),
                found,
            },
        })?;

    Ok(routes.url_for(destination.path(), &params)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::page::PageEntry;
    use crate::route::RouteError;
    use serde_json::json;

    const BASE: &str = "/2017/my-project";

    fn database() -> Database {
        Database::from_value(json!({
            "friends": [
                { "name": "Bill", "permalink": "bill" },
                { "name": "Ted", "permalink": "ted" }
            ],
            "aliases": [
                { "old": "william", "permalink": "bill" },
                { "old": "rufus", "permalink": "rufus" }
            ]
        }))
        .unwrap()
    }

    fn redirect(path: &str, target: &str) -> PageEntry {
        PageEntry {
            redirect: Some(target.into()),
            ..PageEntry::new(path)
        }
    }

    fn friends() -> PageEntry {
        PageEntry {
            collection: Some("friends".into()),
            ..PageEntry::new("friends/:permalink")
        }
    }

    fn table<'db>(db: &'db Database, entries: &[PageEntry]) -> RouteTable<'db> {
        let specs = entries
            .iter()
            .map(|e| PageSpec::new(BASE, Some(db), e).unwrap())
            .collect();
        RouteTable::new("http://localhost:3000", specs).unwrap()
    }

    #[test]
    fn test_resolve_all() {
        let db = database();
        let entries = [
            PageEntry::new("simple"),
            friends(),
            redirect("_root", "simple"),
            redirect("away", "https://example.com/x"),
            PageEntry {
                collection: Some("friends".into()),
                ..redirect("friends/:permalink/", "friends/:permalink")
            },
        ];
        let routes = table(&db, &entries);

        let targets = resolve_all(&routes).unwrap();
        assert_eq!(targets.len(), entries.len());
        assert!(targets[0].is_empty());
        assert_eq!(targets[2], ["/2017/my-project/simple"]);
        assert_eq!(targets[3], ["https://example.com/x"]);
        assert_eq!(
            targets[4],
            ["/2017/my-project/friends/bill", "/2017/my-project/friends/ted"]
        );
    }

    #[test]
    fn test_undeclared_target() {
        let db = database();
        let routes = table(&db, &[redirect("old", "missing")]);
        assert!(matches!(
            resolve_all(&routes),
            Err(GenerateError::InvalidRedirect { ref target, .. }) if target == "missing"
        ));
    }

    #[test]
    fn test_target_field_missing_on_model() {
        let db = database();
        let entries = [
            PageEntry::new("simple"),
            friends(),
            PageEntry {
                collection: Some("aliases".into()),
                ..redirect("people/:old", "friends/:permalink")
            },
        ];
        let routes = table(&db, &entries[..2]);
        let spec = PageSpec::new(BASE, Some(&db), &entries[2]).unwrap();
        let PageKind::Redirect { target } = spec.kind() else {
            unreachable!()
        };

        // `william` maps onto an existing friend.
        let url = resolve(&routes, &spec, target, &spec.endpoints()[0]).unwrap();
        assert_eq!(url, "/2017/my-project/friends/bill");

        // `rufus` has a permalink, but no friend owns it.
        assert!(matches!(
            resolve(&routes, &spec, target, &spec.endpoints()[1]),
            Err(GenerateError::Route(RouteError::NoSuchParams { .. }))
        ));

        // An unbound redirect has no model to read `permalink` from.
        let unbound =
            PageSpec::new(BASE, Some(&db), &redirect("friend", "friends/:permalink")).unwrap();
        assert!(matches!(
            resolve(&routes, &unbound, target, &unbound.endpoints()[0]),
            Err(GenerateError::RedirectMissingField { ref key, .. }) if key == "permalink"
        ));
    }

    #[test]
    fn test_target_field_not_scalar() {
        let db = Database::from_value(json!({
            "friends": [{ "permalink": "bill" }],
            "aliases": [{ "old": "william", "permalink": { "to": "bill" } }]
        }))
        .unwrap();
        let entries = [
            friends(),
            PageEntry {
                collection: Some("aliases".into()),
                ..redirect("people/:old", "friends/:permalink")
            },
        ];
        let routes = table(&db, &entries);
        assert!(matches!(
            resolve_all(&routes),
            Err(GenerateError::RedirectInvalidField { ref key, found: "an object", .. })
                if key == "permalink"
        ));
    }
}
