//! Generator settings.
//!
//! All environment-driven knobs are read once into [`GeneratorSettings`]
//! and passed down explicitly.

use cimatrix_core::ports::Environment;
use cimatrix_core::{Error, Result};

pub const ARCHS_VAR: &str = "BPT_CONAN_ARCHS";
pub const GCC_VERSIONS_VAR: &str = "BPT_GCC_VERSIONS";
pub const CLANG_VERSIONS_VAR: &str = "BPT_CLANG_VERSIONS";
pub const MAC_VERSIONS_VAR: &str = "BPT_MAC_VERSIONS";
pub const WIN_VERSIONS_VAR: &str = "BPT_WIN_VERSIONS";
pub const SPLIT_BY_BUILD_TYPES_VAR: &str = "BPT_SPLIT_BY_BUILD_TYPES";
/// Deprecated spelling of [`SPLIT_BY_BUILD_TYPES_VAR`].
pub const SPLIT_BY_BUILD_TYPES_LEGACY_VAR: &str = "splitByBuildTypes";
pub const CONFIG_FILE_VERSION_VAR: &str = "BPT_CONFIG_FILE_VERSION";
pub const RECIPE_VERSION_VAR: &str = "CONAN_VERSION";

/// Variables carrying the branch reference being built, in lookup order.
pub const BRANCH_REF_VARS: [&str; 2] = ["GITHUB_REF", "BUILD_SOURCEBRANCH"];

pub const DEFAULT_ARCH: &str = "x86_64";

/// Settings for one matrix generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Target architectures, never empty.
    pub archs: Vec<String>,
    pub gcc_versions: Vec<String>,
    pub clang_versions: Vec<String>,
    pub mac_versions: Vec<String>,
    pub win_versions: Vec<String>,
    /// Split flag as configured in the environment.
    pub split_by_build_types: bool,
    /// Version pinned by the branch being built (`testing/<v>`, `stable/<v>`).
    pub explicit_version: Option<String>,
    /// Version declared by the invoking CI configuration file.
    pub config_file_version: u32,
    /// Recipe version forced from the environment.
    pub recipe_version: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            archs: vec![DEFAULT_ARCH.to_string()],
            gcc_versions: vec![],
            clang_versions: vec![],
            mac_versions: vec![],
            win_versions: vec![],
            split_by_build_types: false,
            explicit_version: None,
            config_file_version: 1,
            recipe_version: None,
        }
    }
}

impl GeneratorSettings {
    /// Load settings from the environment.
    pub fn from_env(env: &dyn Environment) -> Result<Self> {
        let mut archs = env.list(ARCHS_VAR);
        if archs.is_empty() {
            archs.push(DEFAULT_ARCH.to_string());
        }

        let config_file_version = match env.var(CONFIG_FILE_VERSION_VAR) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                Error::InvalidConfig(format!(
                    "{} must be an integer, got '{}'",
                    CONFIG_FILE_VERSION_VAR, raw
                ))
            })?,
            None => 1,
        };

        Ok(Self {
            archs,
            gcc_versions: env.list(GCC_VERSIONS_VAR),
            clang_versions: env.list(CLANG_VERSIONS_VAR),
            mac_versions: env.list(MAC_VERSIONS_VAR),
            win_versions: env.list(WIN_VERSIONS_VAR),
            split_by_build_types: env.flag(
                SPLIT_BY_BUILD_TYPES_VAR,
                env.flag(SPLIT_BY_BUILD_TYPES_LEGACY_VAR, false),
            ),
            explicit_version: version_from_ci(env),
            config_file_version,
            recipe_version: env
                .var(RECIPE_VERSION_VAR)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Resolve the split flag: an explicit value wins over the environment.
    pub fn split_by_build_types(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(self.split_by_build_types)
    }
}

/// Version pinned by the branch the CI platform is building, if any.
pub fn version_from_ci(env: &dyn Environment) -> Option<String> {
    BRANCH_REF_VARS
        .iter()
        .filter_map(|name| env.var(name))
        .find(|value| !value.trim().is_empty())
        .and_then(|reference| version_from_ref(&reference))
}

/// Extract `<v>` from `[refs/heads/](testing|stable)/<v>`.
pub fn version_from_ref(reference: &str) -> Option<String> {
    let branch = reference.trim();
    let branch = branch.strip_prefix("refs/heads/").unwrap_or(branch);
    ["testing/", "stable/"]
        .iter()
        .find_map(|prefix| branch.strip_prefix(prefix))
        .filter(|version| !version.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_empty_env() {
        let settings = GeneratorSettings::from_env(&env(&[])).unwrap();
        assert_eq!(settings, GeneratorSettings::default());
    }

    #[test]
    fn test_lists_from_env() {
        let settings = GeneratorSettings::from_env(&env(&[
            ("BPT_CONAN_ARCHS", "x86_64:x86"),
            ("BPT_GCC_VERSIONS", "7:8"),
            ("BPT_WIN_VERSIONS", "16"),
        ]))
        .unwrap();

        assert_eq!(settings.archs, vec!["x86_64", "x86"]);
        assert_eq!(settings.gcc_versions, vec!["7", "8"]);
        assert!(settings.clang_versions.is_empty());
        assert_eq!(settings.win_versions, vec!["16"]);
    }

    #[test]
    fn test_split_flag_precedence() {
        // new-style variable wins over the deprecated one
        let settings = GeneratorSettings::from_env(&env(&[
            ("BPT_SPLIT_BY_BUILD_TYPES", "false"),
            ("splitByBuildTypes", "true"),
        ]))
        .unwrap();
        assert!(!settings.split_by_build_types);

        let settings =
            GeneratorSettings::from_env(&env(&[("splitByBuildTypes", "true")])).unwrap();
        assert!(settings.split_by_build_types);

        // explicit parameter wins over both
        assert!(!settings.split_by_build_types(Some(false)));
        assert!(settings.split_by_build_types(None));
    }

    #[test]
    fn test_config_file_version() {
        let settings =
            GeneratorSettings::from_env(&env(&[("BPT_CONFIG_FILE_VERSION", " 6 ")])).unwrap();
        assert_eq!(settings.config_file_version, 6);

        let err =
            GeneratorSettings::from_env(&env(&[("BPT_CONFIG_FILE_VERSION", "six")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_version_from_ref() {
        assert_eq!(
            version_from_ref("refs/heads/testing/3.0.0").as_deref(),
            Some("3.0.0")
        );
        assert_eq!(version_from_ref("stable/1.2").as_deref(), Some("1.2"));
        assert_eq!(version_from_ref("refs/heads/main"), None);
        assert_eq!(version_from_ref("refs/pull/12/merge"), None);
        assert_eq!(version_from_ref("testing/"), None);
    }

    #[test]
    fn test_version_from_ci_lookup_order() {
        let settings = GeneratorSettings::from_env(&env(&[
            ("GITHUB_REF", "refs/heads/testing/2.0.0"),
            ("BUILD_SOURCEBRANCH", "refs/heads/testing/1.0.0"),
        ]))
        .unwrap();
        assert_eq!(settings.explicit_version.as_deref(), Some("2.0.0"));

        let settings = GeneratorSettings::from_env(&env(&[(
            "BUILD_SOURCEBRANCH",
            "refs/heads/testing/1.0.0",
        )]))
        .unwrap();
        assert_eq!(settings.explicit_version.as_deref(), Some("1.0.0"));
    }
}
