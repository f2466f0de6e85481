//! Rendering seam between page generation and a template engine.
//!
//! Generation only ever talks to [`Render`]. [`TemplateDir`] is the built-in
//! implementation used by the CLI; tests and embedders may supply their own.

mod dir;
mod error;
mod eval;
mod parse;

use std::sync::LazyLock;

use anyhow::{Result, bail};
use serde_json::Value;

use crate::core::{Href, JsonMap};
use crate::route::RouteTable;

pub use dir::TemplateDir;
pub use error::TemplateError;
pub use parse::is_identifier;

/// Names every render scope defines. Globals may not reuse them.
pub const RESERVED_NAMES: [&str; 5] = ["url", "model", "locals", "partial", "routes"];

/// Partials nested deeper than this are assumed to recurse forever.
const MAX_PARTIAL_DEPTH: usize = 32;

static EMPTY_LOCALS: LazyLock<JsonMap> = LazyLock::new(JsonMap::new);

/// A template engine.
///
/// Must be `Sync`: endpoints may be expanded in parallel.
pub trait Render: Sync {
    /// Render template `template` in `scope`.
    fn render(&self, template: &str, scope: &RenderScope<'_>) -> Result<Vec<u8>>;
}

/// Everything a template can see while rendering one endpoint.
#[derive(Clone, Copy)]
pub struct RenderScope<'a> {
    /// Href of the endpoint being rendered.
    pub url: &'a Href,
    pub model: Option<&'a Value>,
    /// Empty for pages; set by the caller of a partial.
    pub locals: &'a JsonMap,
    pub globals: &'a JsonMap,
    pub routes: &'a RouteTable<'a>,
    renderer: &'a dyn Render,
    depth: usize,
}

impl<'a> RenderScope<'a> {
    /// Top-level scope of one endpoint, with empty locals.
    pub fn new(
        url: &'a Href,
        model: Option<&'a Value>,
        globals: &'a JsonMap,
        routes: &'a RouteTable<'a>,
        renderer: &'a dyn Render,
    ) -> Self {
        Self {
            url,
            model,
            locals: &EMPTY_LOCALS,
            globals,
            routes,
            renderer,
            depth: 0,
        }
    }

    /// Render another template with the same url and model and fresh `locals`.
    pub fn partial(&self, template: &str, locals: &JsonMap) -> Result<Vec<u8>> {
        if self.depth >= MAX_PARTIAL_DEPTH {
            bail!(
                "partial `{template}` is nested more than {MAX_PARTIAL_DEPTH} levels deep; does a template include itself?"
            );
        }
        let scope = RenderScope {
            locals,
            depth: self.depth + 1,
            ..*self
        };
        self.renderer.render(template, &scope)
    }

    /// [`partial`](Self::partial) with empty locals.
    pub fn partial_bare(&self, template: &str) -> Result<Vec<u8>> {
        self.partial(template, &EMPTY_LOCALS)
    }
}
