//! Job record types.
//!
//! A [`JobSpec`] is one build configuration as produced by the matrix
//! builder. The assembler copies it into a [`MatrixJob`], adding the working
//! directory and the recipe version it builds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Visual,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "GCC",
            Compiler::Clang => "CLANG",
            Compiler::AppleClang => "APPLE_CLANG",
            Compiler::Visual => "VISUAL",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BuildType {
    Release,
    Debug,
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Release => f.write_str("Release"),
            BuildType::Debug => f.write_str("Debug"),
        }
    }
}

/// A single build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobSpec {
    /// Display name, unique within a final matrix.
    pub name: String,
    pub compiler: Compiler,
    /// Compiler version.
    pub version: String,
    /// Runner image / OS label.
    pub os: String,
    #[serde(rename = "dockerImage", default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(rename = "buildType", default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    /// Target architecture, only set when it differs from the default one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl JobSpec {
    pub fn new(
        name: impl Into<String>,
        compiler: Compiler,
        version: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            compiler,
            version: version.into(),
            os: os.into(),
            docker_image: None,
            build_type: None,
            arch: None,
        }
    }

    pub fn with_docker_image(mut self, image: impl Into<String>) -> Self {
        self.docker_image = Some(image.into());
        self
    }

    /// Tag the job with a non-default architecture, suffixing its name.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        let arch = arch.into();
        self.name = format!("{} {}", self.name, arch);
        self.arch = Some(arch);
        self
    }

    /// Copy of this job restricted to one build type, named `"<name> <type>"`.
    pub fn with_build_type(&self, build_type: BuildType) -> Self {
        Self {
            name: format!("{} {}", self.name, build_type),
            build_type: Some(build_type),
            ..self.clone()
        }
    }
}

/// A job stamped with the directory it runs in and the version it builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixJob {
    #[serde(flatten)]
    pub spec: JobSpec,
    /// Working directory, relative to the repository root.
    pub cwd: String,
    pub recipe_version: String,
}

impl MatrixJob {
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

/// Ordered sequence of final jobs.
pub type Matrix = Vec<MatrixJob>;
