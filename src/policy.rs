/*!
 * Per-target exclusion policy
 */

use tracing::info;

use crate::ignore_file;
use crate::pattern;
use crate::types::Target;
use crate::utils::{base_name, clean_display_path};

/// Ordered, immutable set of exclusion patterns for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    patterns: Vec<String>,
}

impl ExclusionPolicy {
    /// Create a policy from an explicit pattern list
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: normalize_patterns(patterns),
        }
    }

    /// Build the policy for `target`: the global patterns, followed by the
    /// patterns of the ignore file at the root of a directory target.
    pub fn build(global_patterns: &[String], target: &Target) -> Self {
        let mut patterns = normalize_patterns(global_patterns.to_vec());

        if target.is_dir {
            let ignored = ignore_file::load(&target.root);
            if !ignored.is_empty() {
                info!(
                    "Detected {} in {}, adding {} patterns",
                    ignore_file::IGNORE_FILE_NAME,
                    target.display_root,
                    ignored.len()
                );
                patterns.extend(ignored);
            }
        }

        Self { patterns }
    }

    /// Active patterns in evaluation order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Return the first pattern excluding `relative_path`, if any.
    ///
    /// The path must be slash-normalized and relative to the target root.
    pub fn is_excluded(&self, relative_path: &str) -> Option<&str> {
        let name = base_name(relative_path);
        self.patterns
            .iter()
            .find(|p| pattern::matches(p, relative_path, name))
            .map(String::as_str)
    }

    /// Test the target's own display root before traversal.
    ///
    /// Transient roots (temporary clone directories) are never excluded.
    pub fn excludes_root(&self, target: &Target) -> Option<&str> {
        if target.transient {
            return None;
        }
        self.is_excluded(&clean_display_path(&target.display_root))
    }
}

/// Trim patterns and drop the empty ones
pub fn normalize_patterns(patterns: Vec<String>) -> Vec<String> {
    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn dir_target(root: PathBuf, display: &str) -> Target {
        Target {
            root,
            display_root: display.to_string(),
            is_dir: true,
            transient: false,
        }
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let policy = ExclusionPolicy::new(vec!["*.rs".into(), "src/*".into()]);
        assert_eq!(policy.is_excluded("src/main.rs"), Some("*.rs"));
        assert_eq!(policy.is_excluded("src/README"), Some("src/*"));
        assert_eq!(policy.is_excluded("docs/README"), None);
    }

    #[test]
    fn test_empty_policy_excludes_nothing() {
        let policy = ExclusionPolicy::default();
        assert_eq!(policy.is_excluded(".env"), None);
        assert_eq!(policy.is_excluded("a/b/c.log"), None);
    }

    #[test]
    fn test_global_patterns_are_trimmed() {
        let policy = ExclusionPolicy::new(vec![" *.log".into(), "".into(), "  ".into()]);
        assert_eq!(policy.patterns(), &["*.log".to_string()]);
    }

    #[test]
    fn test_build_appends_ignore_file_after_globals() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "# comment\ntarget/\n!keep\n").unwrap();

        let target = dir_target(dir.path().to_path_buf(), "project");
        let policy = ExclusionPolicy::build(&["*.log".into()], &target);

        assert_eq!(policy.patterns(), &["*.log".to_string(), "target/".to_string()]);
    }

    #[test]
    fn test_build_ignores_ignore_file_for_file_targets() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.md\n").unwrap();

        let target = Target {
            root: dir.path().to_path_buf(),
            display_root: "notes.md".into(),
            is_dir: false,
            transient: false,
        };
        let policy = ExclusionPolicy::build(&[], &target);
        assert!(policy.patterns().is_empty());
    }

    #[test]
    fn test_root_precheck() {
        let policy = ExclusionPolicy::new(vec!["vendor".into(), "*.lock".into()]);

        let vendor = dir_target(PathBuf::from("/work/vendor"), "./vendor/");
        assert_eq!(policy.excludes_root(&vendor), Some("vendor"));

        let lock = Target {
            root: PathBuf::from("/work/Cargo.lock"),
            display_root: "Cargo.lock".into(),
            is_dir: false,
            transient: false,
        };
        assert_eq!(policy.excludes_root(&lock), Some("*.lock"));

        let mut clone = dir_target(PathBuf::from("/tmp/ctxcopy-git-1"), "vendor");
        clone.transient = true;
        assert_eq!(policy.excludes_root(&clone), None);
    }
}
