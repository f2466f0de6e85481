//! Generation errors.

use thiserror::Error;

use crate::page::PageError;
use crate::route::RouteError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(
        "path `{path}` tried to redirect to `{target}`, but that is not a valid path in this project; use a valid path"
    )]
    InvalidRedirect { path: String, target: String },

    #[error(
        "path `{path}` redirects to `{target}`, but the model for `{url}` has no `{key}` value to fill it"
    )]
    RedirectMissingField {
        path: String,
        target: String,
        url: String,
        key: String,
    },

    #[error(
        "path `{path}` redirects to `{target}`, but the `{key}` value on the model for `{url}` is {found}; use a string, number or boolean"
    )]
    RedirectInvalidField {
        path: String,
        target: String,
        url: String,
        key: String,
        found: &'static str,
    },

    #[error("redirect `{path}` reached `{url}` without a resolved target")]
    UnresolvedRedirect { path: String, url: String },

    #[error("there is no `{field}` blob on the model for `{url}`")]
    MissingBlob { field: String, url: String },

    #[error("blob `{field}` on the model for `{url}` is {found}; expected a string or an array of bytes")]
    InvalidBlob {
        field: String,
        url: String,
        found: &'static str,
    },

    #[error("failed to render `{url}` with template `{template}`")]
    Render {
        url: String,
        template: String,
        #[source]
        source: anyhow::Error,
    },
}
