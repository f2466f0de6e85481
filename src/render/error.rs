//! Template errors, all naming the template they occurred in.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template `{template}` from {}", .path.display())]
    Read {
        template: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template id `{template}`: {reason}")]
    InvalidId {
        template: String,
        reason: &'static str,
    },

    #[error("{template}:{line}: unclosed `{{{{` tag")]
    UnclosedTag { template: String, line: usize },

    #[error("{template}:{line}: invalid tag `{tag}`: {reason}")]
    InvalidTag {
        template: String,
        line: usize,
        tag: String,
        reason: &'static str,
    },

    #[error("{template}:{line}: `{{{{ end }}}}` without a matching `{{{{ for }}}}`")]
    UnmatchedEnd { template: String, line: usize },

    #[error("{template}:{line}: `{{{{ for }}}}` is never closed with `{{{{ end }}}}`")]
    UnclosedFor { template: String, line: usize },

    #[error("{template}: unknown variable `{name}`")]
    UnknownVariable { template: String, name: String },

    #[error("{template}: cannot iterate over `{expr}`, which is {found}")]
    NotIterable {
        template: String,
        expr: String,
        found: &'static str,
    },

    #[error("{template}: `{expr}` is {found}; expected a non-empty string, a number or a boolean")]
    InvalidArgument {
        template: String,
        expr: String,
        found: &'static str,
    },

    #[error("{template}: partial locals `{expr}` are {found}; expected an object")]
    InvalidLocals {
        template: String,
        expr: String,
        found: &'static str,
    },
}
