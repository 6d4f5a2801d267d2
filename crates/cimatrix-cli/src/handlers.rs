//! Command handlers.

use anyhow::Context;
use cimatrix_core::ports::{Environment, RecipeRepository, VersionControl};
use cimatrix_core::{Error, MatrixJob, Platform, RecipeKind, RepositoryShape, VersionConfig};
use cimatrix_planner::changes;
use cimatrix_planner::{GenerateRequest, GeneratorSettings, Ports, Rendered, generate_matrix};
use cimatrix_workspace::{GitCli, LocalRecipeRepository, ProcessEnvironment};
use console::style;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct GenerateArgs {
    pub platform: Platform,
    pub recipe_type: Option<RecipeKind>,
    pub split_by_build_types: Option<bool>,
    pub repo: PathBuf,
    pub output: Option<PathBuf>,
    pub deny_duplicate_names: bool,
}

/// Generate the job matrix and print it or write it to a file.
pub fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let recipes = LocalRecipeRepository::new(&args.repo);
    let git = GitCli::new(&args.repo);
    let env = ProcessEnvironment::new();

    let request = GenerateRequest {
        platform: args.platform,
        recipe_kind: args.recipe_type,
        split_by_build_types: args.split_by_build_types,
    };
    let ports = Ports {
        vcs: &git,
        env: &env,
        recipes: &recipes,
    };

    let rendered = generate_matrix(&request, ports)
        .with_context(|| format!("generating matrix for {}", args.repo.display()))?;
    enforce_unique_names(&rendered, args.deny_duplicate_names)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered.body)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Matrix written");
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => println!("{}", rendered.body),
    }

    Ok(())
}

fn enforce_unique_names(rendered: &Rendered, deny: bool) -> Result<(), Error> {
    if deny && !rendered.overwritten.is_empty() {
        return Err(Error::DuplicateJobNames(rendered.overwritten.clone()));
    }
    Ok(())
}

/// What the generator would see in a repository.
#[derive(Debug)]
struct DetectReport {
    shape: RepositoryShape,
    recipe_kind: Option<RecipeKind>,
    recipes: Vec<String>,
    changed: Result<Vec<String>, String>,
    explicit_version: Option<String>,
    config_file_version: u32,
}

fn inspect(
    recipes: &dyn RecipeRepository,
    vcs: &dyn VersionControl,
    env: &dyn Environment,
) -> anyhow::Result<DetectReport> {
    let settings = GeneratorSettings::from_env(env)?;
    let shape = recipes.detect_shape()?;

    let (recipe_kind, names) = match shape {
        RepositoryShape::Catalog => (None, recipes.list_recipes()?),
        _ => (Some(recipes.recipe_kind(".")?), Vec::new()),
    };

    let changed = changes::changed_directories(vcs, None)
        .map(|set| set.iter().map(String::from).collect::<Vec<_>>())
        .map_err(|e| e.to_string());

    Ok(DetectReport {
        shape,
        recipe_kind,
        recipes: names,
        changed,
        explicit_version: settings.explicit_version,
        config_file_version: settings.config_file_version,
    })
}

/// Print the repository shape, changed directories and CI version.
pub fn detect(repo: &Path, as_json: bool) -> anyhow::Result<()> {
    let recipes = LocalRecipeRepository::new(repo);
    let git = GitCli::new(repo);
    let report = inspect(&recipes, &git, &ProcessEnvironment::new())?;

    if as_json {
        let changed = match &report.changed {
            Ok(dirs) => json!(dirs),
            Err(_) => serde_json::Value::Null,
        };
        let value = json!({
            "shape": report.shape,
            "recipe_kind": report.recipe_kind,
            "recipes": report.recipes,
            "changed": changed,
            "explicit_version": report.explicit_version,
            "config_file_version": report.config_file_version,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} {}", style("Layout:").bold(), report.shape);
    if let Some(kind) = report.recipe_kind {
        println!("{} {}", style("Recipe type:").bold(), kind);
    }
    if !report.recipes.is_empty() {
        println!("{} {}", style("Recipes:").bold(), report.recipes.len());
        for name in &report.recipes {
            println!("    - {}", name);
        }
    }

    match &report.changed {
        Ok(dirs) if dirs.is_empty() => {
            println!("{} none", style("Changed directories:").bold());
        }
        Ok(dirs) => {
            println!("{}", style("Changed directories:").bold());
            for dir in dirs {
                let shown = if dir.is_empty() { "." } else { dir.as_str() };
                println!("    - {}", shown);
            }
        }
        Err(e) => println!(
            "{} {} {}",
            style("Changed directories:").bold(),
            style("unavailable").yellow(),
            style(e).dim()
        ),
    }

    println!(
        "{} {}",
        style("Explicit version:").bold(),
        report.explicit_version.as_deref().unwrap_or("none")
    );
    println!(
        "{} {}",
        style("CI config version:").bold(),
        report.config_file_version
    );
    Ok(())
}

/// Validate a version configuration file, checking every build value.
pub fn validate(path: &Path) -> anyhow::Result<()> {
    let config = read_version_config(path)?;

    println!(
        "{} {} is valid",
        style("✓").green(),
        style(path.display()).bold()
    );
    println!("  Versions: {}", config.len());
    for policy in config.iter() {
        println!(
            "    - {} ({}, build: {})",
            policy.version, policy.folder, policy.build
        );
    }

    Ok(())
}

fn read_version_config(path: &Path) -> anyhow::Result<VersionConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = VersionConfig::from_yaml_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Print the JSON schema of one matrix job.
pub fn schema() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(MatrixJob);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimatrix_core::BuildPolicy;
    use cimatrix_core::fakes::{MemoryRecipeRepository, MemoryVersionControl};
    use std::collections::HashMap;

    #[test]
    fn test_duplicates_allowed_by_default() {
        let rendered = Rendered {
            body: "{}".to_string(),
            overwritten: vec!["X".to_string()],
        };
        assert!(enforce_unique_names(&rendered, false).is_ok());
    }

    #[test]
    fn test_duplicates_denied() {
        let rendered = Rendered {
            body: "{}".to_string(),
            overwritten: vec!["X".to_string()],
        };
        let err = enforce_unique_names(&rendered, true).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn test_inspect_catalog() {
        let config = VersionConfig::new(vec![cimatrix_core::VersionPolicy::new(
            "1.0",
            "all",
            BuildPolicy::Full,
        )]);
        let recipes = MemoryRecipeRepository::new(RepositoryShape::Catalog)
            .with_recipe("zlib", config.clone())
            .with_recipe("bzip2", config);
        let vcs = MemoryVersionControl::new("main", "main")
            .with_diff("main", ["recipes/zlib/all/conanfile.py"]);
        let env: HashMap<String, String> =
            HashMap::from([("GITHUB_REF".to_string(), "refs/heads/testing/1.0".to_string())]);

        let report = inspect(&recipes, &vcs, &env).unwrap();
        assert_eq!(report.shape, RepositoryShape::Catalog);
        assert_eq!(report.recipe_kind, None);
        assert_eq!(report.recipes, vec!["bzip2", "zlib"]);
        assert_eq!(report.changed, Ok(vec!["recipes/zlib/all".to_string()]));
        assert_eq!(report.explicit_version.as_deref(), Some("1.0"));
        assert_eq!(report.config_file_version, 1);
    }

    #[test]
    fn test_inspect_tolerates_missing_history() {
        let recipes = MemoryRecipeRepository::new(RepositoryShape::SingleRecipeSingleVersion)
            .with_kind(".", RecipeKind::Installer);
        let vcs = MemoryVersionControl::new("main", "main");
        let env: HashMap<String, String> = HashMap::new();

        let report = inspect(&recipes, &vcs, &env).unwrap();
        assert_eq!(report.recipe_kind, Some(RecipeKind::Installer));
        assert!(report.changed.is_err());
    }

    #[test]
    fn test_read_version_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "versions:\n  \"2.0\":\n    folder: all\n  \"1.0\":\n    folder: old\n    build: none\n",
        )
        .unwrap();

        let config = read_version_config(&path).unwrap();
        let versions: Vec<&str> = config.iter().map(|p| p.version.as_str()).collect();
        assert_eq!(versions, vec!["2.0", "1.0"]);
    }

    #[test]
    fn test_read_version_config_rejects_unknown_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "versions:\n  \"1.0\":\n    folder: all\n    build: sometimes\n")
            .unwrap();

        let err = read_version_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("sometimes"));
    }
}
