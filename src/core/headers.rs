//! Response headers attached to every deliverable.

use std::collections::BTreeMap;

/// Header name -> value. Keys are case-sensitive.
pub type Headers = BTreeMap<String, String>;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CACHE_CONTROL: &str = "Cache-Control";
pub const LOCATION: &str = "Location";

/// Default `Content-Type` for rendered pages and redirects.
pub const HTML: &str = "text/html; charset=utf-8";

/// Default short public cache directive.
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=300";

/// The fixed defaults every deliverable starts from.
pub fn default_headers() -> Headers {
    Headers::from([
        (CONTENT_TYPE.to_string(), HTML.to_string()),
        (CACHE_CONTROL.to_string(), DEFAULT_CACHE_CONTROL.to_string()),
    ])
}

/// Defaults overridden by `overrides`.
pub fn merge_headers(overrides: Option<&Headers>) -> Headers {
    let mut headers = default_headers();
    if let Some(overrides) = overrides {
        headers.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    headers
}
