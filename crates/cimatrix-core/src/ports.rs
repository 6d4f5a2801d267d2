//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the matrix planner and the
//! adapters that talk to git, the process environment and the filesystem.
//! Paths are repository-relative and `/`-separated; `"."` is the root.

use crate::recipe::{RecipeKind, RepositoryShape, VersionConfig};
use crate::Result;
use std::collections::{BTreeMap, HashMap};

/// Version-control queries.
pub trait VersionControl {
    /// Hash of the checked-out commit.
    fn current_commit(&self) -> Result<String>;

    /// Name of the checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Name of the repository's default branch (without remote prefix).
    fn default_branch(&self) -> Result<String>;

    /// Paths changed on `head` (or the working tree) since it forked from `base`.
    fn changed_paths(&self, base: &str, head: Option<&str>) -> Result<Vec<String>>;
}

/// Key/value lookups in the invoking environment.
pub trait Environment {
    /// Raw value of a variable, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// Colon-delimited list; entries are trimmed and empty entries dropped.
    fn list(&self, name: &str) -> Vec<String> {
        self.var(name)
            .map(|raw| split_list(&raw))
            .unwrap_or_default()
    }

    /// Boolean flag, `default` when the variable is unset.
    fn flag(&self, name: &str, default: bool) -> bool {
        match self.var(name) {
            Some(raw) => parse_bool(&raw),
            None => default,
        }
    }
}

/// Filesystem queries against a recipe repository.
pub trait RecipeRepository {
    /// Classify the repository root.
    fn detect_shape(&self) -> Result<RepositoryShape>;

    /// Names of the immediate subdirectories of `recipes/`, sorted.
    fn list_recipes(&self) -> Result<Vec<String>>;

    /// `config.yml` in `dir`, or `None` when the file does not exist.
    fn read_version_config(&self, dir: &str) -> Result<Option<VersionConfig>>;

    /// Kind of the recipe whose manifest lives in `dir`.
    fn recipe_kind(&self, dir: &str) -> Result<RecipeKind>;

    /// Version declared by the recipe manifest in `dir`, if any.
    fn recipe_version(&self, dir: &str) -> Result<Option<String>>;

    /// Whether the file at `path` exists and contains `needle`.
    fn file_contains(&self, path: &str, needle: &str) -> bool;
}

/// Split a colon-delimited list.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `1`, `true`, `yes` and `on` (any case) are true; everything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
