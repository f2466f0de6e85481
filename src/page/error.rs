//! Page spec configuration errors.
//!
//! Every variant carries `entry`, the offending record as JSON, so the user
//! can find it in their config.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page spec must have a `path`; please set one: {entry}")]
    MissingPath { entry: String },

    #[error("page spec cannot have path \"/\"; try \"_root\" or \"_root/\": {entry}")]
    RootPath { entry: String },

    #[error("page spec paths cannot start with \"/\"; please delete that character: {entry}")]
    LeadingSlash { entry: String },

    #[error(
        "page spec path includes placeholder character \":\" but has no `model` or `collection`; please add one: {entry}"
    )]
    PlaceholderWithoutBinding { entry: String },

    #[error("page spec has `blob` but no `model` or `collection`; please add one: {entry}")]
    BlobWithoutBinding { entry: String },

    #[error(
        "page spec has `blob` but is missing `headers[\"Content-Type\"]` (case-sensitive); please add one: {entry}"
    )]
    BlobWithoutContentType { entry: String },

    #[error("page spec has both `model` and `collection`, which conflict; please use just one: {entry}")]
    ModelAndCollection { entry: String },

    #[error("page spec has `{field}` but there is no database; please add a database: {entry}")]
    NoDatabase { field: &'static str, entry: String },

    #[error(
        "page spec references model database[\"{key}\"], which does not exist; please add it to the database: {entry}"
    )]
    MissingModel { key: String, entry: String },

    #[error(
        "page spec references collection database[\"{key}\"], which does not exist; please add it to the database: {entry}"
    )]
    MissingCollection { key: String, entry: String },

    #[error(
        "page spec references collection database[\"{key}\"], which is {found}, not an array; please use an array: {entry}"
    )]
    CollectionNotArray {
        key: String,
        found: &'static str,
        entry: String,
    },

    #[error("page spec has both `redirect` and `{other}`; please delete one: {entry}")]
    RedirectConflict { other: &'static str, entry: String },

    #[error(
        "path `{path}` binds database[\"{binding}\"], but a model there is missing a `{key}` value; please set one: {entry}"
    )]
    MissingPlaceholderValue {
        path: String,
        binding: String,
        key: String,
        entry: String,
    },

    #[error(
        "path `{path}` binds database[\"{binding}\"], but the `{key}` value of a model there is {found}; use a string, number or boolean: {entry}"
    )]
    UnsupportedPlaceholderValue {
        path: String,
        binding: String,
        key: String,
        found: &'static str,
        entry: String,
    },

    #[error(
        "two models of database[\"{binding}\"] resolve `{path}` to the same href `{href}`; please change or remove a model, or adjust the path so each model gets a unique URL: {entry}"
    )]
    DuplicateParams {
        path: String,
        binding: String,
        href: String,
        entry: String,
    },
}
