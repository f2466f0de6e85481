//! Path templates with `:name` placeholders.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Href;

/// `:` followed by an ASCII word. An empty name is kept: it names a field
/// no model can have, which surfaces as a missing-value error.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([0-9A-Za-z_]*)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// A declared page path, split into literal text and placeholders.
///
/// ```text
/// friends/:permalink.txt
/// └──────┘└────────┘└──┘
///  literal  :permalink  literal
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    parts: Vec<Part>,
    keys: Vec<String>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut keys = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                parts.push(Part::Literal(raw[last..whole.start()].to_string()));
            }
            parts.push(Part::Placeholder(name.as_str().to_string()));
            keys.push(name.as_str().to_string());
            last = whole.end();
        }
        if last < raw.len() {
            parts.push(Part::Literal(raw[last..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            parts,
            keys,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names, left to right, duplicates kept.
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether the path contains any placeholder.
    #[inline]
    pub fn is_parametric(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Href of a static path (see [`Href::for_static`]).
    pub fn static_href(&self, base_href: &str) -> Href {
        Href::for_static(base_href, &self.raw)
    }

    /// Substitute placeholders positionally. `values` aligns with [`keys`](Self::keys).
    pub fn fill<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut values = values.iter();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(_) => {
                    if let Some(value) = values.next() {
                        out.push_str(value.as_ref());
                    }
                }
            }
        }
        out
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
