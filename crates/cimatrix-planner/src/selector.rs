//! Version selection.

use crate::changes::ChangeSet;
use cimatrix_core::{BuildPolicy, Result, VersionConfig, VersionPolicy};
use tracing::debug;

/// Versions of `config` in scope for this run, in declaration order.
///
/// Without an explicit version, a version is in scope when its folder
/// changed; with one, only the version carrying that label is. Versions
/// with a `none` build policy are never selected. Build values are only
/// checked for versions in scope.
pub fn select_versions(
    config: &VersionConfig,
    changed: &ChangeSet,
    explicit_version: Option<&str>,
) -> Result<Vec<VersionPolicy>> {
    let mut selected = Vec::new();
    for policy in config.iter() {
        let in_scope = match explicit_version {
            Some(explicit) => policy.version == explicit,
            None => changed.contains(&policy.folder),
        };
        if !in_scope {
            continue;
        }
        if policy.build_policy()? == BuildPolicy::None {
            debug!(version = %policy.version, "Skipping version with build policy 'none'");
            continue;
        }
        selected.push(policy.clone());
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> VersionConfig {
        VersionConfig::new(vec![
            VersionPolicy::new("1.2.0", "1.2.0", BuildPolicy::Full),
            VersionPolicy::new("2.0.0", "2.0.0", BuildPolicy::Full),
        ])
    }

    #[test]
    fn test_selects_changed_folder() {
        let changed: ChangeSet = ["1.2.0"].into_iter().collect();
        let selected = select_versions(&config(), &changed, None).unwrap();

        assert_eq!(
            selected,
            vec![VersionPolicy::new("1.2.0", "1.2.0", BuildPolicy::Full)]
        );
    }

    #[test]
    fn test_explicit_version_ignores_changes() {
        let changed: ChangeSet = ["1.2.0"].into_iter().collect();
        let selected = select_versions(&config(), &changed, Some("2.0.0")).unwrap();

        assert_eq!(
            selected,
            vec![VersionPolicy::new("2.0.0", "2.0.0", BuildPolicy::Full)]
        );
    }

    #[test]
    fn test_none_policy_never_selected() {
        let config = VersionConfig::new(vec![
            VersionPolicy::new("1.0", "all", BuildPolicy::None),
            VersionPolicy::new("1.1", "all", BuildPolicy::Minimal),
        ]);
        let changed: ChangeSet = ["all"].into_iter().collect();

        let selected = select_versions(&config, &changed, None).unwrap();
        assert_eq!(
            selected,
            vec![VersionPolicy::new("1.1", "all", BuildPolicy::Minimal)]
        );
        let pinned = select_versions(&config, &changed, Some("1.0")).unwrap();
        assert!(pinned.is_empty());
    }

    #[test]
    fn test_shared_folder_selects_every_version() {
        let config = VersionConfig::new(vec![
            VersionPolicy::new("1.0", "all", BuildPolicy::Full),
            VersionPolicy::new("1.1", "all", BuildPolicy::Full),
            VersionPolicy::new("0.9", "legacy", BuildPolicy::Full),
        ]);
        let changed: ChangeSet = ["all"].into_iter().collect();

        let labels: Vec<String> = select_versions(&config, &changed, None)
            .unwrap()
            .into_iter()
            .map(|p| p.version)
            .collect();
        assert_eq!(labels, vec!["1.0", "1.1"]);
    }

    #[test]
    fn test_unknown_build_value_only_fails_when_selected() {
        let config = VersionConfig::new(vec![
            VersionPolicy::new("1.0", "all", BuildPolicy::Full),
            VersionPolicy::declared("0.9", "legacy", Some("sometimes".to_string())),
        ]);

        let changed: ChangeSet = ["all"].into_iter().collect();
        let labels: Vec<String> = select_versions(&config, &changed, None)
            .unwrap()
            .into_iter()
            .map(|p| p.version)
            .collect();
        assert_eq!(labels, vec!["1.0"]);

        let changed: ChangeSet = ["legacy"].into_iter().collect();
        let err = select_versions(&config, &changed, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown build value 'sometimes' for version 0.9"
        );
        assert!(select_versions(&config, &ChangeSet::default(), Some("0.9")).is_err());
    }

    #[test]
    fn test_nothing_changed() {
        let selected = select_versions(&config(), &ChangeSet::default(), None).unwrap();
        assert!(selected.is_empty());
    }
}
