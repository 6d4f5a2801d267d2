//! Recipe manifest inspection.
//!
//! Only the handful of attributes the planner needs are read; the manifest
//! is never executed.

use crate::layout::RECIPE_MANIFEST;
use cimatrix_core::{RecipeKind, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SETTINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*settings\s*=\s*(.+)$").expect("valid regex"));
static OPTIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*options\s*=").expect("valid regex"));
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

/// Classify the recipe whose manifest is in `dir`; a missing manifest is
/// treated as an ordinary recipe.
pub fn detect_recipe_kind(dir: &Path) -> Result<RecipeKind> {
    Ok(read_manifest(dir)?
        .map(|content| recipe_kind_of(&content))
        .unwrap_or(RecipeKind::Ordinary))
}

/// Version attribute declared in the manifest in `dir`.
pub fn declared_version(dir: &Path) -> Result<Option<String>> {
    Ok(read_manifest(dir)?.and_then(|content| version_of(&content)))
}

pub fn recipe_kind_of(content: &str) -> RecipeKind {
    if is_installer(content) {
        RecipeKind::Installer
    } else if is_unconditional_header_only(content) {
        RecipeKind::HeaderOnly
    } else {
        RecipeKind::Ordinary
    }
}

pub fn version_of(content: &str) -> Option<String> {
    VERSION_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_installer(content: &str) -> bool {
    SETTINGS_RE.captures_iter(content).any(|caps| {
        let value = &caps[1];
        value.contains("os_build") && value.contains("arch_build")
    })
}

fn is_unconditional_header_only(content: &str) -> bool {
    let header_only =
        content.contains("self.info.header_only()") || content.contains("self.info.clear()");
    header_only && !OPTIONS_RE.is_match(content)
}

fn read_manifest(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(RECIPE_MANIFEST);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(std::fs::read_to_string(path)?))
}
