//! Embedded static resources.
//!
//! ```ignore
//! use embed::build::{REDIRECT_HTML, RedirectVars};
//!
//! let html = REDIRECT_HTML.render(&RedirectVars { target_url: "/base/simple" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape_attr;

    /// Variables for redirect.html.
    pub struct RedirectVars<'a> {
        /// Unescaped; escaped on substitution.
        pub target_url: &'a str,
    }

    impl TemplateVars for RedirectVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__TARGET_URL__", &escape_attr(self.target_url))
        }
    }

    /// Body of every redirect endpoint.
    pub const REDIRECT_HTML: Template<RedirectVars<'static>> =
        Template::new(include_str!("build/redirect.html"));

}
