//! Raw page-specification records, as declared in `[[pages]]`.

use serde::{Deserialize, Serialize};

use crate::core::Headers;

/// One declared page entry, before validation.
///
/// ```toml
/// [[pages]]
/// path = "friends/:permalink"
/// template = "friend"
/// collection = "friends"
/// ```
///
/// Exactly which optional fields are set decides the page kind; see
/// [`PageSpec::new`](super::PageSpec::new).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

impl PageEntry {
    /// Entry with only a path set.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn template(&self) -> Option<&str> {
        non_empty(&self.template)
    }

    pub fn model(&self) -> Option<&str> {
        non_empty(&self.model)
    }

    pub fn collection(&self) -> Option<&str> {
        non_empty(&self.collection)
    }

    pub fn blob(&self) -> Option<&str> {
        non_empty(&self.blob)
    }

    pub fn redirect(&self) -> Option<&str> {
        non_empty(&self.redirect)
    }

    /// Whether a model or collection binding is declared.
    pub fn has_binding(&self) -> bool {
        self.model().is_some() || self.collection().is_some()
    }

    /// Declared value of a header, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(name))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The entry as compact JSON, echoed in every configuration error.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Empty strings count as unset.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_unset() {
        let entry = PageEntry {
            template: Some(String::new()),
            model: Some("hero".into()),
            ..PageEntry::new("my-hero")
        };
        assert_eq!(entry.template(), None);
        assert_eq!(entry.model(), Some("hero"));
        assert!(entry.has_binding());
    }

    #[test]
    fn test_to_json_skips_unset_fields() {
        let entry = PageEntry {
            redirect: Some("simple".into()),
            ..PageEntry::new("simple/")
        };
        assert_eq!(entry.to_json(), r#"{"path":"simple/","redirect":"simple"}"#);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let entry: PageEntry = toml::from_str(
            r#"
            path = "friends/:permalink.txt"
            collection = "friends"
            blob = "name"
            headers = { "Content-Type" = "text/plain; charset=utf-8" }
            "#,
        )
        .unwrap();
        assert_eq!(entry.blob(), Some("name"));
        assert_eq!(entry.header("Content-Type"), Some("text/plain; charset=utf-8"));
        assert_eq!(entry.header("content-type"), None);
    }
}
