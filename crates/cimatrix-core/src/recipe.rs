//! Recipe repository types.
//!
//! These types represent the layout of a recipe repository and the
//! user-authored per-version build policy (`config.yml`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How recipes are laid out in a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryShape {
    /// One recipe at the root, building a single version.
    SingleRecipeSingleVersion,
    /// One recipe at the root with a `config.yml` listing several versions.
    SingleRecipeMultiVersion,
    /// Many recipes under `recipes/`, each one multi-version.
    Catalog,
}

impl fmt::Display for RepositoryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepositoryShape::SingleRecipeSingleVersion => "single recipe, single version",
            RepositoryShape::SingleRecipeMultiVersion => "single recipe, multiple versions",
            RepositoryShape::Catalog => "catalog",
        };
        f.write_str(s)
    }
}

/// Kind of recipe, which decides whether compiler coverage is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeKind {
    Ordinary,
    /// Ships a prebuilt tool; built once per OS family.
    Installer,
    /// Header-only regardless of options; built once per OS family.
    HeaderOnly,
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeKind::Ordinary => f.write_str("ordinary"),
            RecipeKind::Installer => f.write_str("installer"),
            RecipeKind::HeaderOnly => f.write_str("header-only"),
        }
    }
}

impl FromStr for RecipeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" | "conan" => Ok(RecipeKind::Ordinary),
            "installer" => Ok(RecipeKind::Installer),
            "header-only" | "header_only" | "unconditional_header_only" => {
                Ok(RecipeKind::HeaderOnly)
            }
            other => Err(Error::UnknownRecipeKind(other.to_string())),
        }
    }
}

/// Per-version build directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPolicy {
    #[default]
    Full,
    Minimal,
    None,
}

impl BuildPolicy {
    /// Parse the `build` value declared for `version`.
    pub fn parse(version: &str, value: &str) -> Result<Self> {
        match value {
            "full" => Ok(BuildPolicy::Full),
            "minimal" => Ok(BuildPolicy::Minimal),
            "none" => Ok(BuildPolicy::None),
            other => Err(Error::UnknownBuildPolicy {
                version: version.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BuildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPolicy::Full => f.write_str("full"),
            BuildPolicy::Minimal => f.write_str("minimal"),
            BuildPolicy::None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionPolicy {
    pub version: String,
    /// Recipe folder for this version, relative to the recipe root.
    pub folder: String,
    /// Declared `build` value, parsed only once the version is selected.
    pub build: String,
}

impl VersionPolicy {
    pub fn new(version: impl Into<String>, folder: impl Into<String>, build: BuildPolicy) -> Self {
        Self {
            version: version.into(),
            folder: folder.into(),
            build: build.to_string(),
        }
    }

    /// A version as written in `config.yml`; a missing `build` key means `full`.
    pub fn declared(
        version: impl Into<String>,
        folder: impl Into<String>,
        build: Option<String>,
    ) -> Self {
        Self {
            version: version.into(),
            folder: folder.into(),
            build: build.unwrap_or_else(|| BuildPolicy::default().to_string()),
        }
    }

    pub fn build_policy(&self) -> Result<BuildPolicy> {
        BuildPolicy::parse(&self.version, &self.build)
    }
}

/// Parsed `config.yml`, versions in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionConfig {
    pub versions: Vec<VersionPolicy>,
}

#[derive(Deserialize)]
struct RawConfigFile {
    #[serde(default)]
    versions: Option<serde_yaml::Mapping>,
}

#[derive(Deserialize)]
struct RawVersionEntry {
    folder: String,
    #[serde(default)]
    build: Option<String>,
}

impl VersionConfig {
    pub fn new(versions: Vec<VersionPolicy>) -> Self {
        Self { versions }
    }

    /// Parse the contents of a `config.yml`.
    ///
    /// Build values are kept as written; see [`VersionConfig::validate`].
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawConfigFile = serde_yaml::from_str(content)?;
        let mapping = raw
            .versions
            .ok_or_else(|| Error::InvalidConfig("missing 'versions' mapping".to_string()))?;

        let mut versions = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let version = version_label(&key)?;
            let entry: RawVersionEntry = serde_yaml::from_value(value).map_err(|e| {
                Error::InvalidConfig(format!("version {}: {}", version, e))
            })?;
            versions.push(VersionPolicy::declared(version, entry.folder, entry.build));
        }

        Ok(Self { versions })
    }

    /// Check the build value of every declared version.
    pub fn validate(&self) -> Result<()> {
        for policy in &self.versions {
            policy.build_policy()?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionPolicy> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

fn version_label(key: &serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => {
            let label = n.to_string();
            if n.is_f64() {
                warn!(
                    version = %label,
                    "Unquoted version key was read as a number; quote it to keep trailing zeros"
                );
            }
            Ok(label)
        }
        other => Err(Error::InvalidConfig(format!(
            "version keys must be strings, got {:?}",
            other
        ))),
    }
}
