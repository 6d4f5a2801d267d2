//! Detection of platforms owned by a legacy CI pipeline.
//!
//! Repositories still running the shared Azure Pipelines template (or the
//! AppVeyor setup) build macOS and/or Windows there, so the array matrix
//! must leave those platforms out.

use cimatrix_core::ports::RecipeRepository;

pub const AZURE_PIPELINES_FILE: &str = "azure-pipelines.yml";
pub const APPVEYOR_FILE: &str = "appveyor.yml";

const AZURE_TEMPLATE_REPO: &str = "name: bincrafters/templates";
const AZURE_TEMPLATE_REF: &str = "template: .ci/azure.yml@templates";
const APPVEYOR_INSTALL: &str = "pip install bincrafters_package_tools";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyOwnership {
    pub macos: bool,
    pub windows: bool,
}

impl LegacyOwnership {
    /// Inspect the legacy CI files at the repository root.
    pub fn detect(repo: &dyn RecipeRepository) -> Self {
        let azure_template = repo.file_contains(AZURE_PIPELINES_FILE, AZURE_TEMPLATE_REPO)
            && repo.file_contains(AZURE_PIPELINES_FILE, AZURE_TEMPLATE_REF);
        let appveyor = repo.file_contains(APPVEYOR_FILE, APPVEYOR_INSTALL);

        Self {
            macos: azure_template,
            windows: azure_template || appveyor,
        }
    }

    pub fn run_macos(&self) -> bool {
        !self.macos
    }

    pub fn run_windows(&self) -> bool {
        !self.windows
    }
}
