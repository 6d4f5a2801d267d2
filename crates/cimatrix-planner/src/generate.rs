//! Matrix generation entry point.

use crate::assembler::MatrixAssembler;
use crate::builder::MatrixBuilder;
use crate::compat;
use crate::legacy::LegacyOwnership;
use crate::serializer::{self, Rendered};
use crate::settings::GeneratorSettings;
use cimatrix_core::ports::{Environment, RecipeRepository, VersionControl};
use cimatrix_core::{Platform, RecipeKind, Result};
use tracing::info;

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    pub platform: Platform,
    /// Use this kind for every recipe instead of detecting it.
    pub recipe_kind: Option<RecipeKind>,
    /// Overrides the environment's split flag when set.
    pub split_by_build_types: Option<bool>,
}

impl GenerateRequest {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            recipe_kind: None,
            split_by_build_types: None,
        }
    }
}

/// Adapters the generator reads from.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub vcs: &'a dyn VersionControl,
    pub env: &'a dyn Environment,
    pub recipes: &'a dyn RecipeRepository,
}

/// Generate and render the job matrix for the repository behind `ports`.
pub fn generate_matrix(request: &GenerateRequest, ports: Ports<'_>) -> Result<Rendered> {
    let settings = GeneratorSettings::from_env(ports.env)?;
    compat::ensure_compatible(request.platform, settings.config_file_version)?;

    let shape = ports.recipes.detect_shape()?;
    let legacy = LegacyOwnership::detect(ports.recipes);
    let split = settings.split_by_build_types(request.split_by_build_types);

    info!(
        platform = %request.platform,
        shape = %shape,
        split,
        explicit_version = settings.explicit_version.as_deref().unwrap_or(""),
        "Generating matrix"
    );

    let builder = MatrixBuilder::new(&settings, legacy);
    let matrix = MatrixAssembler::new(
        request.platform,
        &settings,
        builder,
        ports.recipes,
        ports.vcs,
    )
    .with_kind_override(request.recipe_kind)
    .with_split(split)
    .assemble(shape)?;

    serializer::render(request.platform, &matrix)
}
