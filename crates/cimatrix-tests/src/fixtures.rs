//! Test fixtures for recipe configuration, manifests and CI environments.

use cimatrix_core::{BuildPolicy, MatrixJob, VersionConfig, VersionPolicy};
use cimatrix_planner::settings::CONFIG_FILE_VERSION_VAR;
use serde_json::Value;
use std::collections::HashMap;

/// Factory for `config.yml` contents.
pub struct ConfigFixture;

impl ConfigFixture {
    /// Render a `config.yml`; a `None` build value omits the key.
    pub fn yaml(versions: &[(&str, &str, Option<&str>)]) -> String {
        let mut out = String::from("versions:\n");
        for (version, folder, build) in versions {
            out.push_str(&format!("  \"{}\":\n    folder: {}\n", version, folder));
            if let Some(build) = build {
                out.push_str(&format!("    build: {}\n", build));
            }
        }
        out
    }

    pub fn config(versions: &[(&str, &str, BuildPolicy)]) -> VersionConfig {
        VersionConfig::new(
            versions
                .iter()
                .map(|(version, folder, build)| VersionPolicy::new(*version, *folder, *build))
                .collect(),
        )
    }
}

/// Sample `conanfile.py` contents.
pub struct ManifestFixture;

impl ManifestFixture {
    pub const LIBRARY: &'static str = r#"from conans import ConanFile


class LibConan(ConanFile):
    name = "lib"
    settings = "os", "arch", "compiler", "build_type"
    options = {"shared": [True, False]}
"#;

    pub const INSTALLER: &'static str = r#"from conans import ConanFile


class ToolInstallerConan(ConanFile):
    name = "tool_installer"
    settings = "os_build", "arch_build"
"#;

    pub const HEADER_ONLY: &'static str = r#"from conans import ConanFile


class HeadersConan(ConanFile):
    name = "headers"
    no_copy_source = True

    def package_id(self):
        self.info.header_only()
"#;

    /// An ordinary recipe pinning `version`.
    pub fn library_with_version(version: &str) -> String {
        format!("{}    version = \"{}\"\n", Self::LIBRARY, version)
    }
}

/// Factory for CI environments.
pub struct EnvFixture;

impl EnvFixture {
    /// A CI environment whose config file version supports matrix
    /// generation on every platform, plus `vars`.
    pub fn ci(vars: &[(&str, &str)]) -> HashMap<String, String> {
        let mut env = HashMap::from([(CONFIG_FILE_VERSION_VAR.to_string(), "5".to_string())]);
        for (name, value) in vars {
            env.insert(name.to_string(), value.to_string());
        }
        env
    }
}

/// Job names of an array-shaped matrix, in order.
pub fn job_names(body: &str) -> Vec<String> {
    jobs(body)
        .iter()
        .filter_map(|job| job["name"].as_str().map(String::from))
        .collect()
}

/// Job objects of an array-shaped matrix.
pub fn jobs(body: &str) -> Vec<Value> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["config"].as_array().cloned())
        .unwrap_or_default()
}

/// Parse a rendered array matrix back into jobs.
pub fn matrix_jobs(body: &str) -> Vec<MatrixJob> {
    jobs(body)
        .into_iter()
        .filter_map(|job| serde_json::from_value(job).ok())
        .collect()
}
