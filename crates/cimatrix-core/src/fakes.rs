//! In-memory fakes for the port traits (testing only)
//!
//! Provides `MemoryVersionControl` and `MemoryRecipeRepository`, which
//! satisfy the port contracts without touching git or the filesystem.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::*;
use crate::recipe::{RecipeKind, RepositoryShape, VersionConfig};
use crate::{Error, Result};

// ---------------------------------------------------------------------------
// MemoryVersionControl
// ---------------------------------------------------------------------------

/// Version control backed by a table of `base -> changed paths`.
///
/// A base without an entry behaves like an unknown ref and fails.
#[derive(Debug)]
pub struct MemoryVersionControl {
    commit: String,
    branch: String,
    default_branch: String,
    diffs: HashMap<String, Vec<String>>,
    queries: Mutex<Vec<(String, Option<String>)>>,
}

impl MemoryVersionControl {
    pub fn new(branch: impl Into<String>, default_branch: impl Into<String>) -> Self {
        Self {
            commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            branch: branch.into(),
            default_branch: default_branch.into(),
            diffs: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Register the paths reported when diffing against `base`.
    pub fn with_diff<I, S>(mut self, base: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diffs
            .insert(base.into(), paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// Every `changed_paths` call made so far, in order.
    pub fn queries(&self) -> Vec<(String, Option<String>)> {
        self.queries.lock().unwrap().clone()
    }
}

impl VersionControl for MemoryVersionControl {
    fn current_commit(&self) -> Result<String> {
        Ok(self.commit.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn changed_paths(&self, base: &str, head: Option<&str>) -> Result<Vec<String>> {
        self.queries
            .lock()
            .unwrap()
            .push((base.to_string(), head.map(String::from)));
        self.diffs
            .get(base)
            .cloned()
            .ok_or_else(|| Error::VersionControl(format!("unknown revision '{}'", base)))
    }
}

// ---------------------------------------------------------------------------
// MemoryRecipeRepository
// ---------------------------------------------------------------------------

/// Recipe repository backed by in-memory tables keyed by directory.
#[derive(Debug, Default)]
pub struct MemoryRecipeRepository {
    shape: Option<RepositoryShape>,
    recipes: Vec<String>,
    configs: HashMap<String, VersionConfig>,
    kinds: HashMap<String, RecipeKind>,
    versions: HashMap<String, String>,
    files: HashMap<String, String>,
}

impl MemoryRecipeRepository {
    pub fn new(shape: RepositoryShape) -> Self {
        Self {
            shape: Some(shape),
            ..Default::default()
        }
    }

    /// A repository that matches no known layout.
    pub fn unrecognized() -> Self {
        Self::default()
    }

    pub fn with_recipe(mut self, name: impl Into<String>, config: VersionConfig) -> Self {
        let name = name.into();
        self.configs.insert(format!("recipes/{}", name), config);
        self.recipes.push(name);
        self.recipes.sort();
        self
    }

    /// Catalog entry without a `config.yml`.
    pub fn with_bare_recipe(mut self, name: impl Into<String>) -> Self {
        self.recipes.push(name.into());
        self.recipes.sort();
        self
    }

    pub fn with_config(mut self, dir: impl Into<String>, config: VersionConfig) -> Self {
        self.configs.insert(dir.into(), config);
        self
    }

    pub fn with_kind(mut self, dir: impl Into<String>, kind: RecipeKind) -> Self {
        self.kinds.insert(dir.into(), kind);
        self
    }

    pub fn with_version(mut self, dir: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(dir.into(), version.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl RecipeRepository for MemoryRecipeRepository {
    fn detect_shape(&self) -> Result<RepositoryShape> {
        self.shape
            .ok_or_else(|| Error::UnrecognizedLayout("no recipe found".to_string()))
    }

    fn list_recipes(&self) -> Result<Vec<String>> {
        Ok(self.recipes.clone())
    }

    fn read_version_config(&self, dir: &str) -> Result<Option<VersionConfig>> {
        Ok(self.configs.get(dir).cloned())
    }

    fn recipe_kind(&self, dir: &str) -> Result<RecipeKind> {
        Ok(self.kinds.get(dir).copied().unwrap_or(RecipeKind::Ordinary))
    }

    fn recipe_version(&self, dir: &str) -> Result<Option<String>> {
        Ok(self.versions.get(dir).cloned())
    }

    fn file_contains(&self, path: &str, needle: &str) -> bool {
        self.files
            .get(path)
            .map(|content| content.contains(needle))
            .unwrap_or(false)
    }
}
