//! CLI command definitions.

use cimatrix_core::{Platform, RecipeKind};
use clap::{ArgAction, Subcommand, builder::BoolishValueParser};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the CI job matrix for a recipe repository
    Generate {
        /// Target CI platform (gha, azp)
        #[arg(short, long)]
        platform: Platform,

        /// Use this recipe type instead of detecting it (ordinary, installer, header-only)
        #[arg(long)]
        recipe_type: Option<RecipeKind>,

        /// Split every job into a Release and a Debug job
        #[arg(long, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        split_by_build_types: Option<bool>,

        /// Repository root
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Write the matrix to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail when two jobs share a name in map output
        #[arg(long)]
        deny_duplicate_names: bool,
    },

    /// Show what the generator sees in a repository
    Detect {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a version configuration file
    Validate {
        /// Path to config.yml
        #[arg(default_value = "config.yml")]
        path: PathBuf,
    },

    /// Print the JSON schema of a matrix job
    Schema,
}
