//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Generate a site from a page table and a database
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pagegen.toml)
    #[arg(short = 'C', long, global = true, default_value = "pagegen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate every endpoint and write the artifact
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// List declared paths with their kinds and URLs, without rendering
    #[command(visible_alias = "r")]
    Routes {
        /// Also show each endpoint's redirect target
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Print the URL of a declared path
    #[command(visible_alias = "u")]
    Url {
        /// Declared path, e.g. `friends/:permalink`
        path: String,

        /// Placeholder values, in order
        params: Vec<String>,

        /// Prefix the URL with `site.base_url`
        #[arg(short, long, conflicts_with = "reverse")]
        absolute: bool,

        /// Treat PATH as a generated URL and print the path that declared it
        #[arg(short, long)]
        reverse: bool,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Override `site.base_url`, e.g. for a deployment host
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Expand endpoints in parallel
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub parallel: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["pagegen", "-C", "site.toml", "build", "-p", "-V"]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.parallel, Some(true));
        assert!(build_args.verbose);
        assert!(build_args.output.is_none());
    }

    #[test]
    fn test_parse_url() {
        let cli = Cli::parse_from(["pagegen", "url", "friends/:permalink", "bill", "--absolute"]);
        let Commands::Url {
            path,
            params,
            absolute,
            reverse,
        } = cli.command
        else {
            panic!("expected url");
        };
        assert_eq!(path, "friends/:permalink");
        assert_eq!(params, ["bill"]);
        assert!(absolute);
        assert!(!reverse);
        assert_eq!(cli.config, PathBuf::from("pagegen.toml"));
    }
}
