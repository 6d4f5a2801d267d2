//! Temporary git repositories for end-to-end tests.

use anyhow::{Context, bail};
use cimatrix_workspace::{GitCli, LocalRecipeRepository};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A git repository in a temporary directory, on branch `main`.
///
/// The repository is removed when the value is dropped.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> anyhow::Result<Self> {
        let repo = Self {
            dir: tempfile::tempdir()?,
        };
        repo.git(&["init", "-q"])?;
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"])?;
        repo.configure()?;
        Ok(repo)
    }

    /// Clone `upstream` into a new temporary directory.
    pub fn clone_from(upstream: &TestRepo) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let source = upstream.path().to_string_lossy().into_owned();
        run_git(dir.path(), &["clone", "-q", &source, "."])?;
        let repo = Self { dir };
        repo.configure()?;
        Ok(repo)
    }

    fn configure(&self) -> anyhow::Result<()> {
        self.git(&["config", "user.name", "cimatrix-tests"])?;
        self.git(&["config", "user.email", "tests@cimatrix.invalid"])?;
        self.git(&["config", "commit.gpgsign", "false"])?;
        self.git(&["config", "init.defaultBranch", "main"])?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository and return its trimmed stdout.
    pub fn git(&self, args: &[&str]) -> anyhow::Result<String> {
        run_git(self.path(), args)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> anyhow::Result<()> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }

    /// Stage everything and commit.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-q", "-m", message])?;
        Ok(())
    }

    pub fn checkout_new_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.git(&["checkout", "-q", "-b", branch])?;
        Ok(())
    }

    /// Lay out a catalog recipe: `recipes/<name>/config.yml` plus a manifest
    /// in each version folder.
    pub fn add_catalog_recipe(
        &self,
        name: &str,
        versions: &[(&str, &str)],
        manifest: &str,
    ) -> anyhow::Result<()> {
        let dir = format!("recipes/{}", name);
        let entries: Vec<(&str, &str, Option<&str>)> =
            versions.iter().map(|(v, f)| (*v, *f, None)).collect();
        self.write(&format!("{}/config.yml", dir), &crate::ConfigFixture::yaml(&entries))?;
        for (_, folder) in versions {
            self.write(&format!("{}/{}/conanfile.py", dir, folder), manifest)?;
        }
        Ok(())
    }

    pub fn recipes(&self) -> LocalRecipeRepository {
        LocalRecipeRepository::new(self.path())
    }

    pub fn vcs(&self) -> GitCli {
        GitCli::new(self.path())
    }
}

fn run_git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("failed to run git")?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
