//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stencil - copy UI components from a registry into your project.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add items and their registry dependencies to the project
    Add(AddArgs),

    /// Create components.json and install the base style
    Init(InitArgs),

    /// Show how the project's copy of an item differs from the registry
    Diff(DiffArgs),

    /// List the items available in the registry
    List(ListArgs),
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddArgs {
    /// Item names, `@namespace/name` references, URLs, or local JSON paths
    pub names: Vec<String>,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub overwrite: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Do not run the package manager
    #[arg(long)]
    pub skip_install: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing components.json
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults instead of prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Catalog style
    #[arg(long)]
    pub style: Option<String>,

    /// Base color for the theme variables
    #[arg(long)]
    pub base_color: Option<String>,

    /// Path to the global stylesheet
    #[arg(long)]
    pub css: Option<String>,

    /// Do not run the package manager
    #[arg(long)]
    pub skip_install: bool,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiffArgs {
    /// Item to compare
    pub name: String,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only list items of this type (e.g. `ui`, `registry:hook`)
    #[arg(long = "type", value_name = "TYPE")]
    pub item_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_flags() {
        let cli = Cli::parse_from([
            "stencil",
            "add",
            "button",
            "@acme/card",
            "--overwrite",
            "--skip-install",
        ]);
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.names, vec!["button", "@acme/card"]);
        assert!(args.overwrite);
        assert!(args.skip_install);
        assert!(!args.yes);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["stencil", "list", "--cwd", "/app", "-q"]);
        assert_eq!(cli.cwd, Some(PathBuf::from("/app")));
        assert!(cli.quiet);
    }

    #[test]
    fn parses_init_options() {
        let cli = Cli::parse_from([
            "stencil",
            "init",
            "--yes",
            "--style",
            "default",
            "--base-color",
            "zinc",
            "--css",
            "src/index.css",
        ]);
        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert!(args.yes);
        assert_eq!(args.style.as_deref(), Some("default"));
        assert_eq!(args.base_color.as_deref(), Some("zinc"));
        assert_eq!(args.css.as_deref(), Some("src/index.css"));
    }

    #[test]
    fn diff_requires_a_name() {
        assert!(Cli::try_parse_from(["stencil", "diff"]).is_err());
    }

    #[test]
    fn list_type_filter() {
        let cli = Cli::parse_from(["stencil", "list", "--type", "hook", "--json"]);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(args.json);
        assert_eq!(args.item_type.as_deref(), Some("hook"));
    }
}
