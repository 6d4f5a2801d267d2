//! Recipe repository backed by a local checkout.

use crate::layout::{self, VERSION_CONFIG_FILE};
use crate::manifest;
use cimatrix_core::ports::RecipeRepository;
use cimatrix_core::{RecipeKind, RepositoryShape, Result, VersionConfig};
use std::path::PathBuf;
use tracing::debug;

/// A recipe repository rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalRecipeRepository {
    root: PathBuf,
}

impl LocalRecipeRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        match relative {
            "" | "." => self.root.clone(),
            _ => self.root.join(relative),
        }
    }
}

impl RecipeRepository for LocalRecipeRepository {
    fn detect_shape(&self) -> Result<RepositoryShape> {
        let shape = layout::detect_shape(&self.root)?;
        debug!(root = %self.root.display(), shape = %shape, "Detected repository layout");
        Ok(shape)
    }

    fn list_recipes(&self) -> Result<Vec<String>> {
        layout::list_recipes(&self.root)
    }

    fn read_version_config(&self, dir: &str) -> Result<Option<VersionConfig>> {
        let path = self.resolve(dir).join(VERSION_CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        VersionConfig::from_yaml_str(&content).map(Some)
    }

    fn recipe_kind(&self, dir: &str) -> Result<RecipeKind> {
        manifest::detect_recipe_kind(&self.resolve(dir))
    }

    fn recipe_version(&self, dir: &str) -> Result<Option<String>> {
        manifest::declared_version(&self.resolve(dir))
    }

    fn file_contains(&self, path: &str, needle: &str) -> bool {
        std::fs::read_to_string(self.resolve(path))
            .map(|content| content.contains(needle))
            .unwrap_or(false)
    }
}
