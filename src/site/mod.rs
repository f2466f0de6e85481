//! The generated site: one deliverable per endpoint.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::core::{Headers, Href};
use crate::utils::hash;

/// What a server returns for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliverable {
    pub url: Href,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Deliverable {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Deliverables in declaration order, indexed by URL.
#[derive(Debug, Default)]
pub struct Site {
    deliverables: Vec<Deliverable>,
    by_url: FxHashMap<Href, usize>,
}

/// One `manifest.json` record.
#[derive(Serialize)]
struct ManifestEntry<'a> {
    url: &'a Href,
    headers: &'a Headers,
    /// File name under `objects/`.
    object: String,
}

impl Site {
    /// URLs are unique by construction of the route table.
    pub fn new(deliverables: Vec<Deliverable>) -> Self {
        let by_url = deliverables
            .iter()
            .enumerate()
            .map(|(index, d)| (d.url.clone(), index))
            .collect();
        Self {
            deliverables,
            by_url,
        }
    }

    pub fn get(&self, url: &str) -> Option<&Deliverable> {
        self.by_url.get(url).map(|&index| &self.deliverables[index])
    }

    pub fn len(&self) -> usize {
        self.deliverables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliverables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deliverable> {
        self.deliverables.iter()
    }

    /// Persist the site under `dir`.
    ///
    /// ```text
    /// dir/
    /// ├── manifest.json        [{ url, headers, object }, ...] in declaration order
    /// └── objects/
    ///     └── <fingerprint>    each distinct body once
    /// ```
    ///
    /// Bodies are stored by content rather than by URL path, so `/a` and
    /// `/a/` never fight over one file. Returns the number of objects written.
    pub fn write_to(&self, dir: &Path) -> Result<usize> {
        let objects = dir.join("objects");
        if objects.exists() {
            fs::remove_dir_all(&objects)
                .with_context(|| format!("failed to clear {}", objects.display()))?;
        }
        fs::create_dir_all(&objects)
            .with_context(|| format!("failed to create {}", objects.display()))?;

        let mut written = FxHashSet::default();
        let mut manifest = Vec::with_capacity(self.deliverables.len());

        for deliverable in &self.deliverables {
            let object = hash::fingerprint(&deliverable.body);
            if written.insert(object.clone()) {
                let path = objects.join(&object);
                fs::write(&path, &deliverable.body)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            manifest.push(ManifestEntry {
                url: &deliverable.url,
                headers: &deliverable.headers,
                object,
            });
        }

        let path = dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(written.len())
    }
}

impl<'a> IntoIterator for &'a Site {
    type Item = &'a Deliverable;
    type IntoIter = std::slice::Iter<'a, Deliverable>;

    fn into_iter(self) -> Self::IntoIter {
        self.deliverables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_headers;
    use serde_json::Value;
    use tempfile::TempDir;

    fn deliverable(url: &str, body: &str) -> Deliverable {
        Deliverable {
            url: Href::from(url),
            headers: default_headers(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn site() -> Site {
        Site::new(vec![
            deliverable("/base/simple", "<p>simple</p>"),
            deliverable("/base/simple/", "redirect"),
            deliverable("/base", "redirect"),
        ])
    }

    #[test]
    fn test_get() {
        let site = site();
        assert_eq!(site.len(), 3);
        assert_eq!(site.get("/base/simple").unwrap().body, b"<p>simple</p>");
        assert_eq!(site.get("/base/simple/").unwrap().body, b"redirect");
        assert!(site.get("/base/").is_none());
    }

    #[test]
    fn test_write_to_dedups_bodies() {
        let dir = TempDir::new().unwrap();
        let written = site().write_to(dir.path()).unwrap();
        assert_eq!(written, 2);

        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("manifest.json")).unwrap())
                .unwrap();
        let entries = manifest.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["url"], "/base/simple/");
        assert_eq!(entries[1]["headers"]["Cache-Control"], "public, max-age=300");
        assert_eq!(entries[1]["object"], entries[2]["object"]);

        let object = entries[0]["object"].as_str().unwrap();
        let body = fs::read(dir.path().join("objects").join(object)).unwrap();
        assert_eq!(body, b"<p>simple</p>");
    }

    #[test]
    fn test_write_to_clears_stale_objects() {
        let dir = TempDir::new().unwrap();
        let stale = dir.path().join("objects").join("stale");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        site().write_to(dir.path()).unwrap();
        assert!(!stale.exists());
    }
}
