//! Matrix construction for a single recipe version.

use crate::catalog;
use crate::families;
use crate::legacy::LegacyOwnership;
use crate::settings::GeneratorSettings;
use cimatrix_core::{BuildPolicy, BuildType, JobSpec, Platform, RecipeKind};
use tracing::debug;

/// Builder for the base job list of one recipe version.
#[derive(Debug, Clone)]
pub struct MatrixBuilder<'a> {
    settings: &'a GeneratorSettings,
    legacy: LegacyOwnership,
}

impl<'a> MatrixBuilder<'a> {
    pub fn new(settings: &'a GeneratorSettings, legacy: LegacyOwnership) -> Self {
        Self { settings, legacy }
    }

    /// Build the jobs for `kind` at `build_set`, optionally split into
    /// Release/Debug pairs.
    pub fn build(
        &self,
        platform: Platform,
        kind: RecipeKind,
        build_set: BuildPolicy,
        split: bool,
    ) -> Vec<JobSpec> {
        let jobs = match build_set {
            BuildPolicy::Full => self.full(platform, kind),
            BuildPolicy::Minimal => self.minimal(platform, kind),
            BuildPolicy::None => Vec::new(),
        };

        debug!(
            platform = %platform,
            kind = %kind,
            build_set = %build_set,
            split,
            jobs = jobs.len(),
            "Built base matrix"
        );

        if split {
            split_by_build_type(&jobs)
        } else {
            jobs
        }
    }

    fn full(&self, platform: Platform, kind: RecipeKind) -> Vec<JobSpec> {
        match platform {
            Platform::AzurePipelines => catalog::map_full(),
            Platform::GithubActions => match kind {
                RecipeKind::Installer => catalog::installer(),
                RecipeKind::HeaderOnly => catalog::header_only(),
                RecipeKind::Ordinary => self.expand_families(),
            },
        }
    }

    fn minimal(&self, platform: Platform, kind: RecipeKind) -> Vec<JobSpec> {
        match platform {
            Platform::AzurePipelines => catalog::map_minimal(),
            Platform::GithubActions => match kind {
                RecipeKind::Installer => catalog::installer(),
                RecipeKind::HeaderOnly => catalog::header_only(),
                RecipeKind::Ordinary => {
                    catalog::minimal(self.legacy.run_macos(), self.legacy.run_windows())
                }
            },
        }
    }

    /// gcc, clang, macOS and Windows jobs, in that order.
    fn expand_families(&self) -> Vec<JobSpec> {
        let s = self.settings;
        let mut jobs = Vec::new();

        if !s.gcc_versions.is_empty() {
            jobs.extend(families::gcc_jobs(&s.archs, &s.gcc_versions));
        }
        if !s.clang_versions.is_empty() {
            jobs.extend(families::clang_jobs(&s.archs, &s.clang_versions));
        }
        if self.legacy.run_macos() && !s.mac_versions.is_empty() {
            jobs.extend(families::mac_jobs(&s.archs, &s.mac_versions));
        }
        if self.legacy.run_windows() && !s.win_versions.is_empty() {
            jobs.extend(families::win_jobs(&s.archs, &s.win_versions));
        }

        jobs
    }
}

/// Duplicate every job into an adjacent Release/Debug pair.
pub fn split_by_build_type(jobs: &[JobSpec]) -> Vec<JobSpec> {
    jobs.iter()
        .flat_map(|job| {
            [
                job.with_build_type(BuildType::Release),
                job.with_build_type(BuildType::Debug),
            ]
        })
        .collect()
}
