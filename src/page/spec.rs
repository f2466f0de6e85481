//! Validated page specs and their endpoints.

use serde_json::Value;

use super::lookup::{ParamKey, ReverseLookup};
use super::{PageEntry, PageError, PageKind, PathTemplate, RedirectTarget};
use crate::core::{CONTENT_TYPE, Headers, Href, merge_headers};
use crate::database::{Database, ParamIssue, kind_of, param_value};

/// Which database entry a spec is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Unbound,
    Model(String),
    Collection(String),
}

impl Binding {
    /// Database key, if bound.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Unbound => None,
            Self::Model(key) | Self::Collection(key) => Some(key),
        }
    }
}

/// One concrete `(url, model)` pair of a spec.
#[derive(Debug, Clone)]
pub struct Endpoint<'db> {
    pub url: Href,
    /// Borrowed straight from the database; `None` for unbound specs.
    pub model: Option<&'db Value>,
}

/// A page entry after validation and binding resolution.
///
/// Construction computes every endpoint and the reverse lookup up front;
/// nothing about a spec changes afterwards.
#[derive(Debug, Clone)]
pub struct PageSpec<'db> {
    template: PathTemplate,
    kind: PageKind,
    binding: Binding,
    models: Vec<Option<&'db Value>>,
    headers: Headers,
    endpoints: Vec<Endpoint<'db>>,
    lookup: ReverseLookup,
    /// The declared entry as JSON, for diagnostics.
    entry: String,
}

impl<'db> PageSpec<'db> {
    /// Validate `entry`, bind it against `database` and expand its endpoints.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    ///
    /// 1. the path is set, is not `/` and does not start with `/`
    /// 2. a parametric path has a model or collection
    /// 3. a blob has a model or collection and a `Content-Type` header
    /// 4. model and collection are not both set
    /// 5. the bound key exists (and is an array, for a collection)
    /// 6. a redirect sets neither `template` nor `blob`
    /// 7. every model has a value for every placeholder, and no two models
    ///    produce the same values
    pub fn new(
        base_href: &str,
        database: Option<&'db Database>,
        entry: &PageEntry,
    ) -> Result<Self, PageError> {
        validate_shape(entry)?;
        let (binding, models) = resolve_binding(database, entry)?;
        let kind = resolve_kind(entry)?;

        let template = PathTemplate::parse(&entry.path);
        let mut spec = Self {
            headers: merge_headers(entry.headers.as_ref()),
            endpoints: Vec::new(),
            lookup: ReverseLookup::parametric(),
            entry: entry.to_json(),
            template,
            kind,
            binding,
            models,
        };

        if spec.template.is_parametric() {
            spec.expand_parametric(base_href)?;
        } else {
            spec.expand_static(base_href);
        }

        Ok(spec)
    }

    /// A static path has a single endpoint, carrying the first bound model.
    fn expand_static(&mut self, base_href: &str) {
        let url = self.template.static_href(base_href);
        let model = self.models.first().copied().flatten();
        self.lookup = ReverseLookup::Static(url.clone());
        self.endpoints.push(Endpoint { url, model });
    }

    /// One endpoint per bound model, in binding order.
    fn expand_parametric(&mut self, base_href: &str) -> Result<(), PageError> {
        let mut lookup = ReverseLookup::parametric();
        let mut endpoints = Vec::with_capacity(self.models.len());

        for &model in &self.models {
            let values = self.params_from(model).map_err(|(key, issue)| match issue {
                ParamIssue::Missing => PageError::MissingPlaceholderValue {
                    path: self.template.to_string(),
                    binding: self.binding_name(),
                    key: key.to_string(),
                    entry: self.entry.clone(),
                },
                ParamIssue::Unsupported(found) => PageError::UnsupportedPlaceholderValue {
                    path: self.template.to_string(),
                    binding: self.binding_name(),
                    key: key.to_string(),
                    found,
                    entry: self.entry.clone(),
                },
            })?;

            let url = Href::join(base_href, &self.template.fill(&values));
            lookup
                .insert(values, url.clone())
                .map_err(|existing| PageError::DuplicateParams {
                    path: self.template.to_string(),
                    binding: self.binding_name(),
                    href: existing.to_string(),
                    entry: self.entry.clone(),
                })?;
            endpoints.push(Endpoint { url, model });
        }

        self.lookup = lookup;
        self.endpoints = endpoints;
        Ok(())
    }

    /// Read this spec's placeholder values off `model`.
    ///
    /// Fails on the first placeholder key the model has no usable value for.
    pub fn params_from(&self, model: Option<&Value>) -> Result<ParamKey, (&str, ParamIssue)> {
        self.template
            .keys()
            .iter()
            .map(|key| {
                param_value(model, key)
                    .map(|v| v.into_owned())
                    .map_err(|issue| (key.as_str(), issue))
            })
            .collect()
    }

    fn binding_name(&self) -> String {
        self.binding.key().unwrap_or_default().to_string()
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// The declared path, e.g. `friends/:permalink`.
    #[inline]
    pub fn path(&self) -> &str {
        self.template.as_str()
    }

    #[inline]
    pub fn placeholder_keys(&self) -> &[String] {
        self.template.keys()
    }

    #[inline]
    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    #[inline]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Defaults merged with the entry's declared headers.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline]
    pub fn endpoints(&self) -> &[Endpoint<'db>] {
        &self.endpoints
    }

    #[inline]
    pub fn lookup(&self) -> &ReverseLookup {
        &self.lookup
    }

    /// The declared entry as JSON.
    #[inline]
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

// ============================================================================
// validation
// ============================================================================

/// Checks 1-4: everything decidable from the entry alone.
fn validate_shape(entry: &PageEntry) -> Result<(), PageError> {
    let json = || entry.to_json();

    if entry.path.is_empty() {
        return Err(PageError::MissingPath { entry: json() });
    }
    if entry.path == "/" {
        return Err(PageError::RootPath { entry: json() });
    }
    if entry.path.starts_with('/') {
        return Err(PageError::LeadingSlash { entry: json() });
    }
    if entry.path.contains(':') && !entry.has_binding() {
        return Err(PageError::PlaceholderWithoutBinding { entry: json() });
    }
    if entry.blob().is_some() {
        if !entry.has_binding() {
            return Err(PageError::BlobWithoutBinding { entry: json() });
        }
        if entry.header(CONTENT_TYPE).is_none() {
            return Err(PageError::BlobWithoutContentType { entry: json() });
        }
    }
    if entry.model().is_some() && entry.collection().is_some() {
        return Err(PageError::ModelAndCollection { entry: json() });
    }
    Ok(())
}

/// Check 5: look the binding up and collect the bound models.
fn resolve_binding<'db>(
    database: Option<&'db Database>,
    entry: &PageEntry,
) -> Result<(Binding, Vec<Option<&'db Value>>), PageError> {
    if let Some(key) = entry.model() {
        let database = database.ok_or_else(|| PageError::NoDatabase {
            field: "model",
            entry: entry.to_json(),
        })?;
        let model = database.get(key).ok_or_else(|| PageError::MissingModel {
            key: key.to_string(),
            entry: entry.to_json(),
        })?;
        return Ok((Binding::Model(key.to_string()), vec![Some(model)]));
    }

    if let Some(key) = entry.collection() {
        let database = database.ok_or_else(|| PageError::NoDatabase {
            field: "collection",
            entry: entry.to_json(),
        })?;
        let value = database
            .get(key)
            .ok_or_else(|| PageError::MissingCollection {
                key: key.to_string(),
                entry: entry.to_json(),
            })?;
        let Value::Array(items) = value else {
            return Err(PageError::CollectionNotArray {
                key: key.to_string(),
                found: kind_of(value),
                entry: entry.to_json(),
            });
        };
        return Ok((
            Binding::Collection(key.to_string()),
            items.iter().map(Some).collect(),
        ));
    }

    Ok((Binding::Unbound, vec![None]))
}

/// Check 6, then decide the kind.
fn resolve_kind(entry: &PageEntry) -> Result<PageKind, PageError> {
    if let Some(target) = entry.redirect() {
        if entry.template().is_some() {
            return Err(PageError::RedirectConflict {
                other: "template",
                entry: entry.to_json(),
            });
        }
        if entry.blob().is_some() {
            return Err(PageError::RedirectConflict {
                other: "blob",
                entry: entry.to_json(),
            });
        }
        return Ok(PageKind::Redirect {
            target: RedirectTarget::parse(target),
        });
    }

    if let Some(field) = entry.blob() {
        return Ok(PageKind::Blob {
            field: field.to_string(),
        });
    }

    Ok(PageKind::Page {
        template: entry.template().unwrap_or(&entry.path).to_string(),
    })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CACHE_CONTROL, DEFAULT_CACHE_CONTROL};
    use serde_json::json;

    const BASE: &str = "/2017/my-project";

    fn database() -> Database {
        Database::from_value(json!({
            "hero": { "name": "Superman", "nFriends": 2000 },
            "friends": [
                { "name": "Bill", "permalink": "bill" },
                { "name": "Ted", "permalink": "ted" }
            ],
            "title": "not a collection"
        }))
        .unwrap()
    }

    fn entry(path: &str) -> PageEntry {
        PageEntry::new(path)
    }

    fn collection(path: &str, key: &str) -> PageEntry {
        PageEntry {
            collection: Some(key.into()),
            ..entry(path)
        }
    }

    fn text_headers() -> Option<Headers> {
        Some(Headers::from([(
            CONTENT_TYPE.to_string(),
            "text/plain; charset=utf-8".to_string(),
        )]))
    }

    fn build_err(entry: PageEntry) -> PageError {
        let db = database();
        PageSpec::new(BASE, Some(&db), &entry).unwrap_err()
    }

    // ------------------------------------------------------------------------
    // construction
    // ------------------------------------------------------------------------

    #[test]
    fn test_static_page() {
        let spec = PageSpec::new(BASE, None, &entry("simple")).unwrap();
        assert_eq!(spec.path(), "simple");
        assert_eq!(spec.kind(), &PageKind::Page { template: "simple".into() });
        assert_eq!(spec.binding(), &Binding::Unbound);
        assert_eq!(spec.endpoints().len(), 1);
        assert_eq!(spec.endpoints()[0].url, "/2017/my-project/simple");
        assert!(spec.endpoints()[0].model.is_none());
        assert_eq!(spec.lookup().get::<&str>(&[]).unwrap(), "/2017/my-project/simple");
    }

    #[test]
    fn test_root_paths() {
        let root = PageSpec::new(BASE, None, &entry("_root")).unwrap();
        let root_slash = PageSpec::new(BASE, None, &entry("_root/")).unwrap();
        assert_eq!(root.endpoints()[0].url, "/2017/my-project");
        assert_eq!(root_slash.endpoints()[0].url, "/2017/my-project/");
    }

    #[test]
    fn test_model_binding() {
        let db = database();
        let entry = PageEntry {
            template: Some("hero".into()),
            model: Some("hero".into()),
            ..entry("my-hero")
        };
        let spec = PageSpec::new(BASE, Some(&db), &entry).unwrap();

        assert_eq!(spec.kind(), &PageKind::Page { template: "hero".into() });
        assert_eq!(spec.binding(), &Binding::Model("hero".into()));
        let model = spec.endpoints()[0].model.unwrap();
        assert!(std::ptr::eq(model, db.get("hero").unwrap()));
    }

    #[test]
    fn test_array_as_single_model() {
        let db = database();
        let entry = PageEntry {
            model: Some("friends".into()),
            ..entry("friends")
        };
        let spec = PageSpec::new(BASE, Some(&db), &entry).unwrap();
        assert_eq!(spec.endpoints().len(), 1);
        assert!(spec.endpoints()[0].model.unwrap().is_array());
    }

    #[test]
    fn test_collection_endpoints() {
        let db = database();
        let spec = PageSpec::new(BASE, Some(&db), &collection("friends/:permalink", "friends"))
            .unwrap();

        let friends = db.get("friends").unwrap().as_array().unwrap();
        let endpoints = spec.endpoints();
        assert_eq!(endpoints.len(), friends.len());
        assert_eq!(endpoints[0].url, "/2017/my-project/friends/bill");
        assert_eq!(endpoints[1].url, "/2017/my-project/friends/ted");
        for (endpoint, friend) in endpoints.iter().zip(friends) {
            assert!(std::ptr::eq(endpoint.model.unwrap(), friend));
        }
    }

    #[test]
    fn test_lookup_is_left_inverse_of_expansion() {
        let db = database();
        let spec = PageSpec::new(BASE, Some(&db), &collection("friends/:permalink.txt", "friends"))
            .unwrap();

        for endpoint in spec.endpoints() {
            let params = spec.params_from(endpoint.model).unwrap();
            assert_eq!(spec.lookup().get(&params), Some(&endpoint.url));
        }
    }

    #[test]
    fn test_multi_placeholder_path() {
        let db = Database::from_value(json!({
            "races": [
                { "year": 2016, "state": "ny" },
                { "year": 2016, "state": "nj" },
                { "year": 2018, "state": "ny" }
            ]
        }))
        .unwrap();
        let spec =
            PageSpec::new("", Some(&db), &collection("races/:year/:state", "races")).unwrap();

        assert_eq!(spec.placeholder_keys(), ["year", "state"]);
        assert_eq!(spec.lookup().get(&["2016", "nj"]).unwrap(), "/races/2016/nj");
        assert_eq!(spec.lookup().get(&["2018", "ny"]).unwrap(), "/races/2018/ny");
        assert!(spec.lookup().get(&["2018", "nj"]).is_none());
    }

    #[test]
    fn test_empty_collection_has_no_endpoints() {
        let db = Database::from_value(json!({ "nobody": [] })).unwrap();
        let spec = PageSpec::new(BASE, Some(&db), &collection("x/:id", "nobody")).unwrap();
        assert!(spec.endpoints().is_empty());
    }

    #[test]
    fn test_static_path_with_collection_takes_first_model() {
        let db = database();
        let spec = PageSpec::new(BASE, Some(&db), &collection("first-friend", "friends")).unwrap();
        assert_eq!(spec.endpoints().len(), 1);
        assert_eq!(spec.endpoints()[0].model.unwrap()["permalink"], "bill");
    }

    #[test]
    fn test_blob_kind_and_headers() {
        let db = database();
        let entry = PageEntry {
            blob: Some("name".into()),
            headers: text_headers(),
            ..collection("friends/:permalink.txt", "friends")
        };
        let spec = PageSpec::new(BASE, Some(&db), &entry).unwrap();
        assert_eq!(spec.kind(), &PageKind::Blob { field: "name".into() });
        assert_eq!(spec.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(spec.headers()[CACHE_CONTROL], DEFAULT_CACHE_CONTROL);
    }

    #[test]
    fn test_redirect_kind() {
        let spec = PageSpec::new(
            BASE,
            None,
            &PageEntry {
                redirect: Some("simple".into()),
                ..entry("simple/")
            },
        )
        .unwrap();
        assert_eq!(
            spec.kind(),
            &PageKind::Redirect { target: RedirectTarget::Path("simple".into()) }
        );
    }

    // ------------------------------------------------------------------------
    // validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_missing_path() {
        assert!(matches!(build_err(entry("")), PageError::MissingPath { .. }));
    }

    #[test]
    fn test_slash_path() {
        assert!(matches!(build_err(entry("/")), PageError::RootPath { .. }));
    }

    #[test]
    fn test_leading_slash_rejected_and_echoed() {
        let err = build_err(entry("/simple"));
        assert!(matches!(err, PageError::LeadingSlash { .. }));
        assert!(err.to_string().contains(r#"{"path":"/simple"}"#));
    }

    #[test]
    fn test_placeholder_without_binding() {
        assert!(matches!(
            build_err(entry("friends/:permalink")),
            PageError::PlaceholderWithoutBinding { .. }
        ));
    }

    #[test]
    fn test_blob_without_binding() {
        let err = build_err(PageEntry {
            blob: Some("name".into()),
            headers: text_headers(),
            ..entry("name.txt")
        });
        assert!(matches!(err, PageError::BlobWithoutBinding { .. }));
    }

    #[test]
    fn test_blob_without_content_type() {
        let err = build_err(PageEntry {
            blob: Some("name".into()),
            ..collection("friends/:permalink.txt", "friends")
        });
        assert!(matches!(err, PageError::BlobWithoutContentType { .. }));
    }

    #[test]
    fn test_model_and_collection() {
        let err = build_err(PageEntry {
            model: Some("hero".into()),
            ..collection("friends/:permalink", "friends")
        });
        assert!(matches!(err, PageError::ModelAndCollection { .. }));
    }

    #[test]
    fn test_no_database() {
        let err = PageSpec::new(BASE, None, &collection("friends/:permalink", "friends"))
            .unwrap_err();
        assert!(matches!(err, PageError::NoDatabase { field: "collection", .. }));
    }

    #[test]
    fn test_missing_database_entries() {
        let err = build_err(PageEntry {
            model: Some("villain".into()),
            ..entry("villain")
        });
        assert!(matches!(err, PageError::MissingModel { ref key, .. } if key == "villain"));

        let err = build_err(collection("enemies/:permalink", "enemies"));
        assert!(matches!(err, PageError::MissingCollection { ref key, .. } if key == "enemies"));
    }

    #[test]
    fn test_collection_not_array() {
        let err = build_err(collection("titles/:x", "title"));
        assert!(matches!(err, PageError::CollectionNotArray { found: "a string", .. }));
    }

    #[test]
    fn test_redirect_conflicts() {
        let err = build_err(PageEntry {
            redirect: Some("simple".into()),
            template: Some("simple".into()),
            ..entry("old")
        });
        assert!(matches!(err, PageError::RedirectConflict { other: "template", .. }));

        let err = build_err(PageEntry {
            redirect: Some("simple".into()),
            blob: Some("name".into()),
            headers: text_headers(),
            ..collection("old/:permalink", "friends")
        });
        assert!(matches!(err, PageError::RedirectConflict { other: "blob", .. }));
    }

    #[test]
    fn test_missing_placeholder_value() {
        let err = build_err(collection("friends/:slug", "friends"));
        assert!(matches!(
            err,
            PageError::MissingPlaceholderValue { ref key, ref binding, .. }
                if key == "slug" && binding == "friends"
        ));
    }

    #[test]
    fn test_boolean_placeholder_value() {
        let db = Database::from_value(json!({ "flags": [{ "id": true }, { "id": false }] })).unwrap();
        let spec = PageSpec::new(BASE, Some(&db), &collection("y/:id", "flags")).unwrap();
        let urls: Vec<_> = spec.endpoints().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["/2017/my-project/y/true", "/2017/my-project/y/false"]);
    }

    #[test]
    fn test_unsupported_placeholder_value() {
        let db = Database::from_value(json!({ "flags": [{ "id": ["a"] }] })).unwrap();
        let err = PageSpec::new(BASE, Some(&db), &collection("y/:id", "flags")).unwrap_err();
        assert!(matches!(
            err,
            PageError::UnsupportedPlaceholderValue { ref key, found: "an array", .. } if key == "id"
        ));
        assert!(err.to_string().contains("is an array"));
    }

    #[test]
    fn test_duplicate_placeholder_values() {
        let db = Database::from_value(json!({
            "friends": [{ "permalink": "bill" }, { "permalink": "bill" }]
        }))
        .unwrap();
        let err = PageSpec::new(BASE, Some(&db), &collection("friends/:permalink", "friends"))
            .unwrap_err();
        assert!(matches!(
            err,
            PageError::DuplicateParams { ref href, .. } if href == "/2017/my-project/friends/bill"
        ));
    }

    #[test]
    fn test_validation_order() {
        // Leading slash is reported before the missing binding.
        assert!(matches!(
            build_err(entry("/friends/:permalink")),
            PageError::LeadingSlash { .. }
        ));
        // Missing binding is reported before the blob header.
        assert!(matches!(
            build_err(PageEntry {
                blob: Some("name".into()),
                ..entry("friends/:permalink.txt")
            }),
            PageError::PlaceholderWithoutBinding { .. }
        ));
    }
}
