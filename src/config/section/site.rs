//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! base_url = "http://localhost:3000"
//! base_href = "/2017/my-project"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Where the generated site is served from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Scheme and host (and port), without a path.
    pub base_url: Option<String>,

    /// Prefix of every generated href. `""` serves from the root.
    pub base_href: Option<String>,
}

impl SiteSectionConfig {
    pub const BASE_URL: FieldPath = FieldPath::new("site.base_url");
    pub const BASE_HREF: FieldPath = FieldPath::new("site.base_href");

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_default()
    }

    pub fn base_href(&self) -> &str {
        self.base_href.as_deref().unwrap_or_default()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        self.validate_base_url(diag);
        self.validate_base_href(diag);
    }

    /// # Checks
    /// - present, and parses with the `url` crate
    /// - scheme is `http` or `https`, and a host is set
    /// - no path, query, fragment or trailing slash
    fn validate_base_url(&self, diag: &mut ConfigDiagnostics) {
        const HINT: &str = "use format like http://localhost:3000";

        let Some(raw) = &self.base_url else {
            diag.error_with_hint(Self::BASE_URL, "base_url is required", HINT);
            return;
        };

        let parsed = match url::Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                diag.error_with_hint(Self::BASE_URL, format!("invalid URL: {e}"), HINT);
                return;
            }
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            diag.error_with_hint(
                Self::BASE_URL,
                format!(
                    "scheme '{}' not supported, must be http or https",
                    parsed.scheme()
                ),
                HINT,
            );
        }
        if parsed.host_str().is_none() {
            diag.error_with_hint(Self::BASE_URL, "URL must have a valid host", HINT);
        }
        if parsed.path() != "/" {
            diag.error_with_hint(
                Self::BASE_URL,
                format!("URL must not have a path, found '{}'", parsed.path()),
                format!("move the path into {}", Self::BASE_HREF),
            );
        } else if raw.ends_with('/') {
            diag.error_with_hint(
                Self::BASE_URL,
                "URL must not end with '/'",
                format!("use \"{}\"", raw.trim_end_matches('/')),
            );
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            diag.error(Self::BASE_URL, "URL must not have a query or fragment");
        }
    }

    fn validate_base_href(&self, diag: &mut ConfigDiagnostics) {
        let Some(href) = &self.base_href else {
            diag.error_with_hint(
                Self::BASE_HREF,
                "base_href is required",
                "use \"\" to serve from the root",
            );
            return;
        };

        if href.is_empty() {
            return;
        }
        if !href.starts_with('/') {
            diag.error_with_hint(
                Self::BASE_HREF,
                format!("'{href}' must start with '/'"),
                format!("use \"/{href}\""),
            );
        } else if href.ends_with('/') {
            let trimmed = href.trim_end_matches('/');
            diag.error_with_hint(
                Self::BASE_HREF,
                format!("'{href}' must not end with '/'"),
                format!("use \"{trimmed}\""),
            );
        }
    }
}
