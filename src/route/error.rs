//! Route table errors: registration conflicts and failed lookups.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("two page specs declare path `{path}`; please delete one: {entry}")]
    DuplicatePath { path: String, entry: String },

    #[error(
        "page specs `{first}` and `{second}` both generate URL `{url}`; please change one so every URL is unique"
    )]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },

    #[error("url_for(\"{path}\") starts with \"/\"; please delete that character")]
    LeadingSlash { path: String },

    #[error("url_for(\"{path}\") does not match any page spec; known paths: {}", .known.join(", "))]
    PathNotFound { path: String, known: Vec<String> },

    #[error(
        "url_for(\"{path}\") needs {} parameter{} ({}), but got {given}",
        .keys.len(),
        crate::utils::plural_s(.keys.len()),
        .keys.join(", ")
    )]
    ParamCount {
        path: String,
        keys: Vec<String>,
        given: usize,
    },

    #[error("url_for(\"{path}\") has no page for parameters ({}); check the database", .params.join(", "))]
    NoSuchParams { path: String, params: Vec<String> },
}
