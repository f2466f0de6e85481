//! Built-in renderer: `.html` templates read from one directory.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::parse::Template;
use super::{Render, RenderScope, TemplateError, eval};
use crate::debug;

/// Renders template `id` from `<root>/<id>.html`.
///
/// Each template is read and parsed once; parallel renders share the parse.
#[derive(Debug)]
pub struct TemplateDir {
    root: PathBuf,
    cache: RwLock<FxHashMap<String, Arc<Template>>>,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, id: &str) -> Result<Arc<Template>, TemplateError> {
        if let Some(template) = self.cache.read().get(id) {
            return Ok(Arc::clone(template));
        }

        if let Some(reason) = unsafe_component(id) {
            return Err(TemplateError::InvalidId {
                template: id.to_string(),
                reason,
            });
        }

        let path = self.root.join(format!("{id}.html"));
        let source = fs::read_to_string(&path).map_err(|source| TemplateError::Read {
            template: id.to_string(),
            path: path.clone(),
            source,
        })?;
        let parsed = Arc::new(Template::parse(id, &source)?);
        debug!("render"; "parsed {}", path.display());

        // Another thread may have parsed it meanwhile; keep the first.
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(id.to_string()).or_insert(parsed)))
    }
}

/// Template ids stay inside the template directory.
fn unsafe_component(id: &str) -> Option<&'static str> {
    Path::new(id).components().find_map(|comp| match comp {
        Component::ParentDir => Some("parent directory '..' not allowed"),
        Component::Prefix(_) | Component::RootDir => Some("absolute paths not allowed"),
        _ => None,
    })
}

impl Render for TemplateDir {
    fn render(&self, template: &str, scope: &RenderScope<'_>) -> Result<Vec<u8>> {
        let parsed = self.load(template)?;
        eval::render(&parsed, scope)
    }
}
