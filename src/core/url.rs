//! Generated URL type.
//!
//! An [`Href`] is the site-relative address of one endpoint, always prefixed
//! with the configured base href (e.g. `/2017/my-project/friends/bill`).
//! Unlike a page permalink, it is never normalized: `_root` and `_root/`
//! produce two distinct hrefs on purpose.

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Reserved leading segment that addresses the base href itself.
pub const ROOT_SEGMENT: &str = "_root";

/// Site-relative URL of a generated endpoint.
///
/// Cheap to clone; shared between a spec's endpoints, its reverse lookup
/// and the route table's URL index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Href(Arc<str>);

impl Href {
    /// Wrap an already-built href.
    pub fn new(href: impl Into<Arc<str>>) -> Self {
        Self(href.into())
    }

    /// Join a path relative to the base href: `base_href + "/" + rel`.
    pub fn join(base_href: &str, rel: &str) -> Self {
        Self(Arc::from(format!("{base_href}/{rel}")))
    }

    /// Href of a static path.
    ///
    /// A path starting with the `_root` segment maps onto the base href with
    /// that segment stripped:
    ///
    /// ```text
    /// _root        -> /base
    /// _root/       -> /base/
    /// _root.txt    -> /base.txt
    /// simple       -> /base/simple
    /// _rooted      -> /base/_rooted
    /// ```
    pub fn for_static(base_href: &str, path: &str) -> Self {
        match strip_root_segment(path) {
            Some(rest) => Self(Arc::from(format!("{base_href}{rest}"))),
            None => Self::join(base_href, path),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix with a site base URL (scheme + host, no trailing slash).
    pub fn to_absolute(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.0)
    }
}

/// Strip a leading `_root` segment, if `path` starts with one.
///
/// The segment must end at a non-word character or at the end of the path.
fn strip_root_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(ROOT_SEGMENT)?;
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

impl std::fmt::Display for Href {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Href {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for Href {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&str> for Href {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl PartialEq<str> for Href {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for Href {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for Href {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Href {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
