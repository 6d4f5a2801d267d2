//! Matrix assembly across recipes and versions.

use crate::builder::MatrixBuilder;
use crate::changes::{self, ChangeSet};
use crate::selector::select_versions;
use crate::settings::GeneratorSettings;
use cimatrix_core::ports::{RecipeRepository, VersionControl};
use cimatrix_core::{
    BuildPolicy, Error, JobSpec, Matrix, MatrixJob, Platform, RecipeKind, RepositoryShape,
    Result,
};
use tracing::{debug, info, warn};

pub const RECIPES_DIR: &str = "recipes";

/// Stitches per-version matrices into the final job list.
pub struct MatrixAssembler<'a> {
    platform: Platform,
    settings: &'a GeneratorSettings,
    builder: MatrixBuilder<'a>,
    recipes: &'a dyn RecipeRepository,
    vcs: &'a dyn VersionControl,
    kind_override: Option<RecipeKind>,
    split: bool,
}

/// Where a multi-version recipe lives and how its jobs are labelled.
struct RecipeScope {
    /// Recipe root, relative to the repository root.
    dir: String,
    /// Catalog recipe name; `None` for a root-level recipe.
    name: Option<String>,
}

impl RecipeScope {
    fn path_filter(&self) -> Option<String> {
        self.name.as_ref().map(|_| format!("{}/", self.dir))
    }

    fn cwd(&self, folder: &str) -> String {
        match self.name {
            Some(_) => format!("{}/{}", self.dir, folder),
            None => folder.to_string(),
        }
    }

    fn job_name(&self, version: &str, job: &str) -> String {
        match &self.name {
            Some(recipe) => format!("{}/{} {}", recipe, version, job),
            None => format!("{} {}", version, job),
        }
    }
}

impl<'a> MatrixAssembler<'a> {
    pub fn new(
        platform: Platform,
        settings: &'a GeneratorSettings,
        builder: MatrixBuilder<'a>,
        recipes: &'a dyn RecipeRepository,
        vcs: &'a dyn VersionControl,
    ) -> Self {
        Self {
            platform,
            settings,
            builder,
            recipes,
            vcs,
            kind_override: None,
            split: false,
        }
    }

    /// Use `kind` for every recipe instead of detecting it.
    pub fn with_kind_override(mut self, kind: Option<RecipeKind>) -> Self {
        self.kind_override = kind;
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    /// Assemble the final matrix for a repository of the given shape.
    pub fn assemble(&self, shape: RepositoryShape) -> Result<Matrix> {
        let matrix = match shape {
            RepositoryShape::SingleRecipeSingleVersion => self.single_version()?,
            RepositoryShape::SingleRecipeMultiVersion => {
                let changed = self.changed_paths()?;
                let scope = RecipeScope {
                    dir: ".".to_string(),
                    name: None,
                };
                self.multi_version(&scope, &changed)?
                    .ok_or_else(|| Error::InvalidConfig("missing config.yml".to_string()))?
            }
            RepositoryShape::Catalog => {
                let changed = self.changed_paths()?;
                let mut matrix = Vec::new();
                for name in self.recipes.list_recipes()? {
                    let scope = RecipeScope {
                        dir: format!("{}/{}", RECIPES_DIR, name),
                        name: Some(name),
                    };
                    match self.multi_version(&scope, &changed)? {
                        Some(jobs) => matrix.extend(jobs),
                        None => warn!(recipe = %scope.dir, "Skipping recipe without config.yml"),
                    }
                }
                matrix
            }
        };

        info!(shape = %shape, jobs = matrix.len(), "Assembled matrix");
        Ok(matrix)
    }

    fn single_version(&self) -> Result<Matrix> {
        let kind = self.kind_for(".")?;
        let version = self.resolve_recipe_version(".")?;

        let jobs = self
            .builder
            .build(self.platform, kind, BuildPolicy::Full, self.split)
            .into_iter()
            .map(|spec| MatrixJob {
                spec,
                cwd: "./".to_string(),
                recipe_version: version.clone(),
            })
            .collect();
        Ok(jobs)
    }

    /// Jobs for every selected version of one recipe, or `None` when the
    /// recipe has no `config.yml`.
    fn multi_version(&self, scope: &RecipeScope, changed: &[String]) -> Result<Option<Matrix>> {
        let Some(config) = self.recipes.read_version_config(&scope.dir)? else {
            return Ok(None);
        };

        let filter = scope.path_filter();
        let changes = ChangeSet::from_paths(changed, filter.as_deref());
        let selected = select_versions(
            &config,
            &changes,
            self.settings.explicit_version.as_deref(),
        )?;

        debug!(
            recipe = %scope.dir,
            declared = config.len(),
            selected = selected.len(),
            "Selected versions"
        );

        let mut matrix = Vec::new();
        for policy in selected {
            let recipe_dir = join(&scope.dir, &policy.folder);
            let kind = self.kind_for(&recipe_dir)?;
            let jobs = self
                .builder
                .build(self.platform, kind, policy.build_policy()?, self.split);

            info!(
                recipe = %scope.dir,
                version = %policy.version,
                build = %policy.build,
                jobs = jobs.len(),
                "Adding version"
            );

            matrix.extend(
                jobs.into_iter()
                    .map(|job| self.stamp(scope, &policy.version, &policy.folder, job)),
            );
        }

        Ok(Some(matrix))
    }

    fn stamp(&self, scope: &RecipeScope, version: &str, folder: &str, job: JobSpec) -> MatrixJob {
        let name = scope.job_name(version, &job.name);
        MatrixJob {
            spec: JobSpec { name, ..job },
            cwd: scope.cwd(folder),
            recipe_version: version.to_string(),
        }
    }

    fn kind_for(&self, dir: &str) -> Result<RecipeKind> {
        match self.kind_override {
            Some(kind) => Ok(kind),
            None => self.recipes.recipe_kind(dir),
        }
    }

    /// Changed file paths, skipped entirely when the CI pins a version.
    fn changed_paths(&self) -> Result<Vec<String>> {
        if let Some(version) = &self.settings.explicit_version {
            debug!(version = %version, "Explicit version set, not resolving changes");
            return Ok(Vec::new());
        }
        changes::changed_paths(self.vcs)
    }

    fn resolve_recipe_version(&self, dir: &str) -> Result<String> {
        if let Some(version) = &self.settings.recipe_version {
            return Ok(version.clone());
        }
        if let Some(version) = self.recipes.recipe_version(dir)? {
            return Ok(version);
        }
        self.settings
            .explicit_version
            .clone()
            .ok_or_else(|| Error::UnresolvedVersion(dir.to_string()))
    }
}

fn join(dir: &str, child: &str) -> String {
    if dir == "." || dir.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", dir, child)
    }
}
