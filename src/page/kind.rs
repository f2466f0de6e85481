//! What a page spec produces for each of its endpoints.

/// Page kind, decided once when the spec is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// Render a template with the endpoint's model.
    Page { template: String },
    /// Emit the raw bytes of a model field.
    Blob { field: String },
    /// Point at an absolute URL or another declared path.
    Redirect { target: RedirectTarget },
}

impl PageKind {
    /// Short name for logs and progress counters.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Page { .. } => "page",
            Self::Blob { .. } => "blob",
            Self::Redirect { .. } => "redirect",
        }
    }
}

/// Destination of a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// `http://` or `https://` URL, used verbatim.
    Absolute(String),
    /// Another declared path, resolved through the route table.
    Path(String),
}

impl RedirectTarget {
    pub fn parse(target: &str) -> Self {
        if target.starts_with("http://") || target.starts_with("https://") {
            Self::Absolute(target.to_string())
        } else {
            Self::Path(target.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(s) | Self::Path(s) => s,
        }
    }
}
