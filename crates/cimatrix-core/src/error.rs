//! Error types for cimatrix.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Unknown build value '{value}' for version {version}")]
    UnknownBuildPolicy { version: String, value: String },

    #[error("Unrecognized repository layout: {0}")]
    UnrecognizedLayout(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Unknown recipe type: {0}")]
    UnknownRecipeKind(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot resolve the recipe version in {0}")]
    UnresolvedVersion(String),

    #[error("Duplicate job names in map output: {}", .0.join(", "))]
    DuplicateJobNames(Vec<String>),

    // Compatibility errors
    #[error(
        "cimatrix {tool_version} requires a newer {platform} CI config file for '{feature}'; minimum version {required} - current version {current}"
    )]
    Incompatible {
        tool_version: String,
        platform: String,
        feature: String,
        required: u32,
        current: u32,
    },

    // Infrastructure errors
    #[error("Version control error: {0}")]
    VersionControl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error belongs to the configuration class (malformed or
    /// unrecognized input).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownBuildPolicy { .. }
                | Error::UnrecognizedLayout(_)
                | Error::UnsupportedPlatform(_)
                | Error::UnknownRecipeKind(_)
                | Error::InvalidConfig(_)
                | Error::UnresolvedVersion(_)
                | Error::DuplicateJobNames(_)
        )
    }

    /// Whether the invoking CI configuration is too old for this tool.
    pub fn is_compatibility(&self) -> bool {
        matches!(self, Error::Incompatible { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let err = Error::UnknownBuildPolicy {
            version: "1.0".to_string(),
            value: "sometimes".to_string(),
        };
        assert!(err.is_configuration());
        assert!(!err.is_compatibility());

        let err = Error::Incompatible {
            tool_version: "0.1.0".to_string(),
            platform: "gha".to_string(),
            feature: "generate-ci-jobs".to_string(),
            required: 5,
            current: 3,
        };
        assert!(err.is_compatibility());
        assert!(!err.is_configuration());
        let message = err.to_string();
        assert!(message.contains("minimum version 5"));
        assert!(message.contains("current version 3"));
    }

    #[test]
    fn test_duplicate_names_message() {
        let err = Error::DuplicateJobNames(vec!["GCC 7".to_string(), "CLANG 8".to_string()]);
        assert_eq!(
            err.to_string(),
            "Duplicate job names in map output: GCC 7, CLANG 8"
        );
    }
}
