//! RouteTable - every declared path and generated URL of a site.

use rustc_hash::FxHashMap;

use super::RouteError;
use crate::core::Href;
use crate::page::PageSpec;

/// Immutable registry of page specs.
///
/// Indexes specs both by declared path (for `url_for`) and by generated URL
/// (for collision detection and reverse lookup). Built once per generation
/// and shared by reference with every render.
#[derive(Debug)]
pub struct RouteTable<'db> {
    base_url: String,
    specs: Vec<PageSpec<'db>>,
    /// Declared path -> index into `specs`
    by_path: FxHashMap<String, usize>,
    /// Generated URL -> index into `specs`
    by_url: FxHashMap<Href, usize>,
}

impl<'db> RouteTable<'db> {
    /// Register `specs` in declaration order.
    ///
    /// Fails on the first repeated declared path or generated URL.
    pub fn new(base_url: impl Into<String>, specs: Vec<PageSpec<'db>>) -> Result<Self, RouteError> {
        let mut by_path = FxHashMap::default();
        let mut by_url: FxHashMap<Href, usize> = FxHashMap::default();

        for (index, spec) in specs.iter().enumerate() {
            if by_path.insert(spec.path().to_string(), index).is_some() {
                return Err(RouteError::DuplicatePath {
                    path: spec.path().to_string(),
                    entry: spec.entry().to_string(),
                });
            }

            for endpoint in spec.endpoints() {
                if let Some(&first) = by_url.get(&endpoint.url) {
                    return Err(RouteError::DuplicateUrl {
                        url: endpoint.url.to_string(),
                        first: specs[first].path().to_string(),
                        second: spec.path().to_string(),
                    });
                }
                by_url.insert(endpoint.url.clone(), index);
            }
        }

        Ok(Self {
            base_url: base_url.into(),
            specs,
            by_path,
            by_url,
        })
    }

    /// Specs in declaration order.
    #[inline]
    pub fn specs(&self) -> &[PageSpec<'db>] {
        &self.specs
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Total number of endpoints across all specs.
    pub fn endpoint_count(&self) -> usize {
        self.by_url.len()
    }

    /// Find the spec declared with exactly `path`.
    pub fn resolve_path(&self, path: &str) -> Result<&PageSpec<'db>, RouteError> {
        self.by_path
            .get(path)
            .map(|&index| &self.specs[index])
            .ok_or_else(|| RouteError::PathNotFound {
                path: path.to_string(),
                known: self.known_paths().into_iter().map(String::from).collect(),
            })
    }

    /// URL of the endpoint `path` generates for `params`.
    ///
    /// `params` are the placeholder values in the order the placeholders
    /// appear in `path`. A static path takes none.
    pub fn url_for<S: AsRef<str>>(&self, path: &str, params: &[S]) -> Result<&Href, RouteError> {
        if path.starts_with('/') {
            return Err(RouteError::LeadingSlash {
                path: path.to_string(),
            });
        }

        let spec = self.resolve_path(path)?;
        let keys = spec.placeholder_keys();
        if params.len() != keys.len() {
            return Err(RouteError::ParamCount {
                path: path.to_string(),
                keys: keys.to_vec(),
                given: params.len(),
            });
        }

        spec.lookup()
            .get(params)
            .ok_or_else(|| RouteError::NoSuchParams {
                path: path.to_string(),
                params: params.iter().map(|p| p.as_ref().to_string()).collect(),
            })
    }

    /// [`url_for`](Self::url_for) prefixed with the site's base URL.
    pub fn absolute_url_for<S: AsRef<str>>(
        &self,
        path: &str,
        params: &[S],
    ) -> Result<String, RouteError> {
        Ok(self.url_for(path, params)?.to_absolute(&self.base_url))
    }

    /// Declared path of the spec that generated `url`.
    pub fn path_for_url(&self, url: &str) -> Option<&str> {
        self.by_url.get(url).map(|&index| self.specs[index].path())
    }

    /// Declared paths, sorted.
    pub fn known_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.by_path.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
