//! Target CI platforms.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The wire shape a platform expects its job matrix in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// `{"config": [job, ...]}`
    Array,
    /// `{"<job name>": job, ...}`
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub Actions, consumes an array-shaped matrix.
    #[serde(rename = "gha")]
    GithubActions,
    /// Azure Pipelines, consumes a name-keyed matrix.
    #[serde(rename = "azp")]
    AzurePipelines,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GithubActions => "gha",
            Platform::AzurePipelines => "azp",
        }
    }

    pub fn shape(&self) -> OutputShape {
        match self {
            Platform::GithubActions => OutputShape::Array,
            Platform::AzurePipelines => OutputShape::Map,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gha" | "array" => Ok(Platform::GithubActions),
            "azp" | "map" => Ok(Platform::AzurePipelines),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_aliases() {
        assert_eq!("gha".parse::<Platform>().unwrap(), Platform::GithubActions);
        assert_eq!("array".parse::<Platform>().unwrap(), Platform::GithubActions);
        assert_eq!("AZP".parse::<Platform>().unwrap(), Platform::AzurePipelines);
        assert_eq!("map".parse::<Platform>().unwrap(), Platform::AzurePipelines);
    }

    #[test]
    fn test_unsupported_platform() {
        let err = "travis".parse::<Platform>().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Unsupported platform: travis");
    }
}
