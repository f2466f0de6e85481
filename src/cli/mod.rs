//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod routes;
pub mod url;

pub use args::{BuildArgs, Cli, Commands};
