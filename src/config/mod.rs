//! Site configuration management for `pagegen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site] and [build]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file discovery
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[site]`    | `base_url` and `base_href`                    |
//! | `[build]`   | Template dir, output dir, database, parallel  |
//! | `[globals]` | Free-form values visible to every template    |
//! | `[[pages]]` | Page entries, in declaration order            |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildSectionConfig, SiteSectionConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    core::JsonMap,
    generator::GenerateOptions,
    log,
    page::PageEntry,
    render::{RESERVED_NAMES, is_identifier},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pagegen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Values visible to templates by name.
    #[serde(default)]
    pub globals: JsonMap,

    /// Page entries in declaration order.
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

impl SiteConfig {
    pub const GLOBALS: FieldPath = FieldPath::new("globals");
    pub const PAGES: FieldPath = FieldPath::new("pages");

    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cwd, &cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.apply_command_options(cli);
        self.build.normalize(&root);
        self.root = root;
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Settings of a generation run.
    pub fn to_options(&self, progress: bool) -> GenerateOptions {
        GenerateOptions {
            base_url: self.site.base_url().to_string(),
            base_href: self.site.base_href().to_string(),
            parallel: self.build.parallel,
            progress,
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Routes { verbose } => crate::logger::set_verbose(*verbose),
            Commands::Url { .. } => {}
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.parallel, args.parallel.as_ref());
        if let Some(url) = &args.base_url {
            self.site.base_url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once. Page entries
    /// are checked later, one by one, when the route table is built.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.build.validate(&self.root, &mut diag);
        self.validate_globals(&mut diag);
        if self.pages.is_empty() {
            diag.warn(Self::PAGES, "no pages declared");
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Global names share the template scope with the built-in names.
    fn validate_globals(&self, diag: &mut ConfigDiagnostics) {
        for name in self.globals.keys() {
            let field = FieldPath::owned(format!("{}.{name}", Self::GLOBALS.as_str()));
            if RESERVED_NAMES.contains(&name.as_str()) {
                diag.error_with_hint(
                    field,
                    format!("'{name}' is a reserved template name"),
                    format!("reserved: {}", RESERVED_NAMES.join(", ")),
                );
            } else if !is_identifier(name) {
                diag.error_with_hint(
                    field,
                    format!("'{name}' is not usable as a template variable"),
                    "use letters, digits and '_', not starting with a digit",
                );
            }
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config with the required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config =
        format!("[site]\nbase_url = \"http://localhost:3000\"\nbase_href = \"/2017/my-project\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[site\nbase_url = \"x\"").is_err());
    }

    #[test]
    fn test_parse_pages_and_globals() {
        let config = test_parse_config(
            r#"
[globals]
title = "My Project"
year = 2017

[[pages]]
path = "simple"

[[pages]]
path = "friends/:permalink"
template = "friend"
collection = "friends"

[[pages]]
path = "friends/:permalink.txt"
collection = "friends"
blob = "name"
headers = { "Content-Type" = "text/plain" }
"#,
        );

        assert_eq!(config.site.base_href(), "/2017/my-project");
        assert_eq!(config.globals["title"], json!("My Project"));
        assert_eq!(config.globals["year"], json!(2017));
        assert_eq!(config.pages.len(), 3);
        assert_eq!(config.pages[1].template(), Some("friend"));
        assert_eq!(config.pages[2].blob(), Some("name"));
        assert_eq!(config.pages[2].header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\nbase_href = \"\"\n[unknown_section]\nfield = 1\n[[pages]]\npath = \"a\"\ntempalte = \"b\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.pages.len(), 1);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
        assert!(ignored.iter().any(|f| f.contains("tempalte")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[site]\nbase_url = \"http://a.com\"\n[globals]\nanything = { nested = [1, 2] }";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_globals() {
        let config = test_parse_config(
            "[globals]\ntitle = \"ok\"\nmodel = 1\n\"2fast\" = 2\n[[pages]]\npath = \"a\"",
        );

        let mut diag = ConfigDiagnostics::new();
        config.validate_globals(&mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["globals.model", "globals.2fast"]);
    }

    #[test]
    fn test_cli_overrides_and_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagegen.toml");
        fs::write(
            &path,
            "[site]\nbase_url = \"http://localhost:3000\"\nbase_href = \"\"\n[build]\nparallel = true",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "pagegen",
            "build",
            "--output",
            "dist",
            "--base-url",
            "https://example.com",
            "--parallel=false",
        ]);
        assert!(matches!(cli.command, Commands::Build { .. }));

        let mut config = SiteConfig::from_path(&path).unwrap();
        config.config_path = path;
        config.finalize(&cli);

        assert_eq!(config.root, dir.path());
        assert_eq!(config.build.output, dir.path().join("dist"));
        assert_eq!(config.build.templates, dir.path().join("views"));

        let options = config.to_options(false);
        assert_eq!(options.base_url, "https://example.com");
        assert_eq!(options.base_href, "");
        assert!(!options.parallel);
    }

    #[test]
    fn test_validate_reports_every_error() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::from_str(
            "[site]\nbase_url = \"http://localhost:3000/\"\nbase_href = \"blog/\"\n[globals]\nurl = 1",
        )
        .unwrap();
        config.root = dir.path().to_path_buf();
        config.build.normalize(dir.path());

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["site.base_url", "site.base_href", "globals.url"]);
    }
}
