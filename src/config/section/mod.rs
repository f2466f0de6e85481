//! Configuration section definitions.
//!
//! Each module corresponds to a section in `pagegen.toml`:
//!
//! | Module  | TOML Section | Purpose                                 |
//! |---------|--------------|-----------------------------------------|
//! | `build` | `[build]`    | Templates, output, database, parallelism |
//! | `site`  | `[site]`     | Base URL and base href                  |
//!
//! `[globals]` and `[[pages]]` are free-form and validated in the root config.

mod build;
mod site;

pub use build::BuildSectionConfig;
pub use site::SiteSectionConfig;
