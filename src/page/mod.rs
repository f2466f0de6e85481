//! Page types: declared entries, path templates and validated specs.

mod entry;
mod error;
mod kind;
mod lookup;
mod spec;
mod template;

pub use entry::PageEntry;
pub use error::PageError;
pub use kind::{PageKind, RedirectTarget};
pub use spec::{Endpoint, PageSpec};
pub use template::PathTemplate;
