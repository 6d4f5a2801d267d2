//! Git command-line adapter.

use cimatrix_core::ports::VersionControl;
use cimatrix_core::{Error, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

const REMOTE: &str = "origin";
const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Runs `git` in a repository directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    /// Default branch as advertised by the remote itself.
    fn remote_default_branch(&self) -> Option<String> {
        let output = self.run(&["ls-remote", "--symref", REMOTE, "HEAD"]).ok()?;
        parse_symref(&output)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(args = ?args, "Running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| Error::VersionControl(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::VersionControl(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VersionControl for GitCli {
    fn current_commit(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn default_branch(&self) -> Result<String> {
        let remote_head = format!("refs/remotes/{}/HEAD", REMOTE);
        if let Ok(reference) = self.run(&["symbolic-ref", "--short", &remote_head]) {
            let prefix = format!("{}/", REMOTE);
            return Ok(reference
                .strip_prefix(&prefix)
                .unwrap_or(&reference)
                .to_string());
        }

        if let Some(branch) = self.remote_default_branch() {
            debug!(branch = %branch, "Default branch from remote");
            return Ok(branch);
        }

        match self.run(&["config", "--get", "init.defaultBranch"]) {
            Ok(branch) if !branch.is_empty() => Ok(branch),
            _ => {
                warn!(
                    remote = REMOTE,
                    fallback = FALLBACK_DEFAULT_BRANCH,
                    "Cannot determine the default branch"
                );
                Ok(FALLBACK_DEFAULT_BRANCH.to_string())
            }
        }
    }

    fn changed_paths(&self, base: &str, head: Option<&str>) -> Result<Vec<String>> {
        let range = match head {
            Some(head) => format!("{}...{}", base, head),
            None => base.to_string(),
        };
        let output = self.run(&["diff", "--name-only", &range])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Branch name from `git ls-remote --symref` output
/// (`ref: refs/heads/<branch>\tHEAD`).
fn parse_symref(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (reference, target) = line.strip_prefix("ref: ")?.split_once('\t')?;
        if target.trim() != "HEAD" {
            return None;
        }
        reference
            .strip_prefix("refs/heads/")
            .map(String::from)
    })
}
