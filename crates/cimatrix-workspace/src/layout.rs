//! Repository layout detection.

use cimatrix_core::{Error, RepositoryShape, Result};
use std::path::Path;

pub const RECIPES_DIR: &str = "recipes";
pub const VERSION_CONFIG_FILE: &str = "config.yml";
pub const RECIPE_MANIFEST: &str = "conanfile.py";

/// Classify the repository rooted at `root`.
pub fn detect_shape(root: &Path) -> Result<RepositoryShape> {
    if !list_recipes(root)?.is_empty() {
        return Ok(RepositoryShape::Catalog);
    }
    if root.join(VERSION_CONFIG_FILE).is_file() {
        return Ok(RepositoryShape::SingleRecipeMultiVersion);
    }
    if root.join(RECIPE_MANIFEST).is_file() {
        return Ok(RepositoryShape::SingleRecipeSingleVersion);
    }
    Err(Error::UnrecognizedLayout(format!(
        "{} has no {}/ directory, {} or {}",
        root.display(),
        RECIPES_DIR,
        VERSION_CONFIG_FILE,
        RECIPE_MANIFEST
    )))
}

/// Names of the subdirectories of `root/recipes`, sorted; empty when the
/// directory does not exist.
pub fn list_recipes(root: &Path) -> Result<Vec<String>> {
    let recipes = root.join(RECIPES_DIR);
    if !recipes.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(&recipes)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_catalog() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("recipes/zlib/all")).unwrap();
        fs::create_dir_all(dir.path().join("recipes/bzip2")).unwrap();
        fs::write(dir.path().join("recipes/README.md"), "").unwrap();
        // a catalog wins over a stray config.yml at the root
        fs::write(dir.path().join("config.yml"), "versions: {}\n").unwrap();

        assert_eq!(detect_shape(dir.path()).unwrap(), RepositoryShape::Catalog);
        assert_eq!(list_recipes(dir.path()).unwrap(), vec!["bzip2", "zlib"]);
    }

    #[test]
    fn test_empty_recipes_dir_is_not_a_catalog() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("recipes")).unwrap();
        fs::write(dir.path().join("conanfile.py"), "").unwrap();

        assert_eq!(
            detect_shape(dir.path()).unwrap(),
            RepositoryShape::SingleRecipeSingleVersion
        );
    }

    #[test]
    fn test_multi_version() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), "versions: {}\n").unwrap();

        assert_eq!(
            detect_shape(dir.path()).unwrap(),
            RepositoryShape::SingleRecipeMultiVersion
        );
    }

    #[test]
    fn test_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let err = detect_shape(dir.path()).unwrap_err();
        assert!(err.is_configuration());
    }
}
