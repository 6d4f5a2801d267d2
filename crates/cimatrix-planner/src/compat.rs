//! CI configuration file compatibility.
//!
//! The CI configuration that invokes cimatrix declares a version number;
//! features refuse to run against configurations older than they support.

use cimatrix_core::{Error, Platform, Result};

pub const GENERATE_MATRIX_FEATURE: &str = "generate-ci-jobs";

/// Minimum CI config file version supporting matrix generation.
pub fn minimum_config_version(platform: Platform) -> u32 {
    match platform {
        Platform::GithubActions => 5,
        Platform::AzurePipelines => 4,
    }
}

pub fn ensure_compatible(platform: Platform, current: u32) -> Result<()> {
    let required = minimum_config_version(platform);
    if current >= required {
        return Ok(());
    }
    Err(Error::Incompatible {
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        platform: platform.to_string(),
        feature: GENERATE_MATRIX_FEATURE.to_string(),
        required,
        current,
    })
}
