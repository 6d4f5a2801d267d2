//! Change set resolution.
//!
//! Computes which directories changed between the checked-out commit and
//! the repository's default branch.

use cimatrix_core::ports::VersionControl;
use cimatrix_core::{Error, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Remote used to qualify the default branch.
pub const REMOTE: &str = "origin";

/// Deduplicated set of changed directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    dirs: BTreeSet<String>,
}

impl ChangeSet {
    /// Build a change set from changed file paths.
    ///
    /// With a `path_filter`, only paths containing it are kept and the filter
    /// is removed from them. Each path is then reduced to its directory.
    pub fn from_paths<S: AsRef<str>>(paths: &[S], path_filter: Option<&str>) -> Self {
        let dirs = paths
            .iter()
            .map(AsRef::as_ref)
            .filter_map(|path| match path_filter {
                Some(filter) if !filter.is_empty() => {
                    path.contains(filter).then(|| path.replace(filter, ""))
                }
                _ => Some(path.to_string()),
            })
            .map(|path| parent_dir(&path))
            .collect();

        Self { dirs }
    }

    pub fn contains(&self, dir: &str) -> bool {
        self.dirs.contains(dir.trim_end_matches('/'))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            dirs: iter
                .into_iter()
                .map(|dir| dir.into().trim_end_matches('/').to_string())
                .collect(),
        }
    }
}

/// Changed file paths between the default branch and the current commit.
///
/// When the checked-out branch is not the default branch, the
/// remote-qualified default branch is queried as well, since a CI checkout
/// may lack a local ref for it. Either query may fail in that case, as long
/// as one succeeds.
pub fn changed_paths(vcs: &dyn VersionControl) -> Result<Vec<String>> {
    let current_commit = vcs.current_commit()?;
    let current_branch = vcs.current_branch()?;
    let default_branch = vcs.default_branch()?;

    debug!(
        commit = %current_commit,
        branch = %current_branch,
        default_branch = %default_branch,
        "Resolving changed paths"
    );

    if current_branch == default_branch {
        return vcs.changed_paths(&default_branch, Some(&current_commit));
    }

    let remote_ref = format!("{}/{}", REMOTE, default_branch);
    let local = vcs.changed_paths(&default_branch, Some(&current_commit));
    let remote = vcs.changed_paths(&remote_ref, Some(&current_commit));

    match (local, remote) {
        (Ok(mut local), Ok(remote)) => {
            local.extend(remote);
            Ok(local)
        }
        (Ok(paths), Err(e)) => {
            debug!(reference = %remote_ref, error = %e, "Remote default branch unavailable");
            Ok(paths)
        }
        (Err(e), Ok(paths)) => {
            debug!(reference = %default_branch, error = %e, "Local default branch unavailable");
            Ok(paths)
        }
        (Err(local), Err(remote)) => Err(Error::VersionControl(format!(
            "cannot diff against '{}' ({}) or '{}' ({})",
            default_branch, local, remote_ref, remote
        ))),
    }
}

/// Resolve the changed directories, optionally under `path_filter`.
pub fn changed_directories(
    vcs: &dyn VersionControl,
    path_filter: Option<&str>,
) -> Result<ChangeSet> {
    let paths = changed_paths(vcs)?;
    Ok(ChangeSet::from_paths(&paths, path_filter))
}

fn parent_dir(path: &str) -> String {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => path[..idx].trim_end_matches('/').to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimatrix_core::fakes::MemoryVersionControl;

    #[test]
    fn test_paths_reduce_to_directories() {
        let changes = ChangeSet::from_paths(
            &[
                "1.2.0/conanfile.py",
                "1.2.0/test_package/conanfile.py",
                "1.2.0/conandata.yml",
                "README.md",
            ],
            None,
        );

        let dirs: Vec<&str> = changes.iter().collect();
        assert_eq!(dirs, vec!["", "1.2.0", "1.2.0/test_package"]);
    }

    #[test]
    fn test_path_filter_strips_prefix() {
        let changes = ChangeSet::from_paths(
            &[
                "recipes/foo/1.0/conanfile.py",
                "recipes/foo/config.yml",
                "recipes/bar/all/conanfile.py",
            ],
            Some("recipes/foo/"),
        );

        assert!(changes.contains("1.0"));
        assert!(changes.contains(""));
        assert!(!changes.contains("all"));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_same_branch_queries_once() {
        let vcs = MemoryVersionControl::new("main", "main").with_diff("main", ["1.0/conanfile.py"]);

        let changes = changed_directories(&vcs, None).unwrap();
        assert!(changes.contains("1.0"));
        assert_eq!(vcs.queries().len(), 1);
        assert_eq!(vcs.queries()[0].1.as_deref(), Some(vcs.commit()));
    }

    #[test]
    fn test_feature_branch_unions_local_and_remote() {
        let vcs = MemoryVersionControl::new("feature", "main")
            .with_diff("main", ["1.0/conanfile.py"])
            .with_diff("origin/main", ["2.0/conanfile.py"]);

        let changes = changed_directories(&vcs, None).unwrap();
        assert!(changes.contains("1.0"));
        assert!(changes.contains("2.0"));
        assert_eq!(vcs.queries().len(), 2);
    }

    #[test]
    fn test_feature_branch_without_local_default_ref() {
        let vcs = MemoryVersionControl::new("feature", "main")
            .with_diff("origin/main", ["2.0/conanfile.py"]);

        let changes = changed_directories(&vcs, None).unwrap();
        assert!(changes.contains("2.0"));
    }

    #[test]
    fn test_both_queries_failing_is_an_error() {
        let vcs = MemoryVersionControl::new("feature", "main");
        let err = changed_directories(&vcs, None).unwrap_err();
        assert!(matches!(err, Error::VersionControl(_)));
    }

    #[test]
    fn test_default_branch_query_failure_propagates() {
        let vcs = MemoryVersionControl::new("main", "main");
        assert!(changed_directories(&vcs, None).is_err());
    }
}
