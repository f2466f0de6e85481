//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! templates = "views"         # built-in renderer reads <templates>/<id>.html
//! output = "public"           # artifact directory
//! database = "database.json"  # optional, .json or .toml
//! parallel = true             # expand endpoints with rayon
//! ```
//!
//! Relative paths are resolved against the directory of `pagegen.toml`.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Template directory.
    pub templates: PathBuf,

    /// Build output directory.
    pub output: PathBuf,

    /// Database file. Without one, no page may bind a model.
    pub database: Option<PathBuf>,

    /// Expand endpoints in parallel.
    pub parallel: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            templates: "views".into(),
            output: "public".into(),
            database: None,
            parallel: true,
        }
    }
}

impl BuildSectionConfig {
    pub const TEMPLATES: FieldPath = FieldPath::new("build.templates");
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const DATABASE: FieldPath = FieldPath::new("build.database");

    /// Make every path absolute against `root`.
    pub fn normalize(&mut self, root: &Path) {
        self.templates = root.join(&self.templates);
        self.output = root.join(&self.output);
        if let Some(database) = self.database.take() {
            self.database = Some(root.join(database));
        }
    }

    /// # Checks
    /// - `database`, when set, is a `.json` or `.toml` file that exists
    /// - `templates` exists (warning only: a site of blobs needs none)
    /// - `output` is not the config directory itself
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        if let Some(database) = &self.database {
            let ext = database.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("json" | "toml")) {
                diag.error_with_hint(
                    Self::DATABASE,
                    format!("unsupported database format: {}", database.display()),
                    "use a .json or .toml file",
                );
            } else if !database.is_file() {
                diag.error(
                    Self::DATABASE,
                    format!("database not found: {}", database.display()),
                );
            }
        }

        if !self.templates.is_dir() {
            diag.warn(
                Self::TEMPLATES,
                format!("template directory not found: {}", self.templates.display()),
            );
        }

        if self.output == root {
            diag.error_with_hint(
                Self::OUTPUT,
                "output must not be the project root",
                "use a subdirectory such as \"public\"",
            );
        }
    }
}
