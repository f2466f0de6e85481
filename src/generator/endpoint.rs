//! Expanding one endpoint into a deliverable.

use serde_json::Value;

use super::GenerateError;
use crate::core::{JsonMap, LOCATION};
use crate::database::kind_of;
use crate::embed::build::{REDIRECT_HTML, RedirectVars};
use crate::logger::ProgressLine;
use crate::page::{Endpoint, PageKind, PageSpec};
use crate::render::{Render, RenderScope};
use crate::route::RouteTable;
use crate::site::Deliverable;

static NULL: Value = Value::Null;

/// One endpoint awaiting expansion.
pub struct Job<'a, 'db> {
    pub spec: &'a PageSpec<'db>,
    pub endpoint: &'a Endpoint<'db>,
    /// Pre-resolved `Location`, for redirects.
    pub location: Option<&'a str>,
}

/// Shared, read-only state of one expansion run.
pub struct Expander<'a> {
    pub routes: &'a RouteTable<'a>,
    pub globals: &'a JsonMap,
    pub renderer: &'a dyn Render,
    pub progress: Option<&'a ProgressLine>,
}

impl Expander<'_> {
    pub fn expand(&self, job: &Job<'_, '_>) -> Result<Deliverable, GenerateError> {
        let Job {
            spec,
            endpoint,
            location,
        } = *job;
        let url = &endpoint.url;
        let mut headers = spec.headers().clone();

        let body = match spec.kind() {
            PageKind::Page { template } => {
                let scope =
                    RenderScope::new(url, endpoint.model, self.globals, self.routes, self.renderer);
                self.renderer
                    .render(template, &scope)
                    .map_err(|source| GenerateError::Render {
                        url: url.to_string(),
                        template: template.clone(),
                        source,
                    })?
            }
            PageKind::Blob { field } => blob_bytes(endpoint.model, field, url.as_str())?,
            PageKind::Redirect { .. } => {
                let target = location.ok_or_else(|| GenerateError::UnresolvedRedirect {
                    path: spec.path().to_string(),
                    url: url.to_string(),
                })?;
                headers.insert(LOCATION.to_string(), target.to_string());
                REDIRECT_HTML
                    .render(&RedirectVars { target_url: target })
                    .into_bytes()
            }
        };

        if let Some(progress) = self.progress {
            progress.inc(spec.kind().name());
        }

        Ok(Deliverable {
            url: url.clone(),
            headers,
            body,
        })
    }
}

/// Raw bytes of a blob field: a string's UTF-8, or an array of bytes.
pub fn blob_bytes(
    model: Option<&Value>,
    field: &str,
    url: &str,
) -> Result<Vec<u8>, GenerateError> {
    let value = model.and_then(|m| m.get(field)).unwrap_or(&NULL);
    let invalid = || GenerateError::InvalidBlob {
        field: field.to_string(),
        url: url.to_string(),
        found: kind_of(value),
    };

    match value {
        Value::Null => Err(GenerateError::MissingBlob {
            field: field.to_string(),
            url: url.to_string(),
        }),
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(invalid)
            })
            .collect(),
        _ => Err(invalid()),
    }
}
