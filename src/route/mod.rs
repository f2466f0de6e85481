//! Route registry: declared paths and generated URLs of all page specs.

mod error;
mod table;

pub use error::RouteError;
pub use table::RouteTable;
