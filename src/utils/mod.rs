//! Small shared helpers.

pub mod hash;
pub mod html;
pub mod plural;

pub use plural::{plural_count, plural_s};
