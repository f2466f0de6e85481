//! Core types - pure abstractions shared across the codebase.

mod headers;
mod url;

pub use headers::{
    CACHE_CONTROL, CONTENT_TYPE, DEFAULT_CACHE_CONTROL, Headers, LOCATION, default_headers,
    merge_headers,
};
pub use url::Href;

/// A JSON object map: database records, globals and template locals.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
