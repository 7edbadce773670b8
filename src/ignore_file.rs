/*!
 * Loading exclusion patterns from a target's ignore file
 */

use std::fs;
use std::path::Path;

use tracing::debug;

/// Name of the ignore file read at the root of a directory target
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Read the ignore file at the root of `dir` into an ordered pattern list.
///
/// Only the root is consulted; nested ignore files are not. A missing or
/// unreadable file yields an empty list. Blank lines and `#` comments are
/// dropped, and so are `!` negations, which are not supported.
pub fn load(dir: &Path) -> Vec<String> {
    let path = dir.join(IGNORE_FILE_NAME);
    match fs::read_to_string(&path) {
        Ok(content) => parse(&content),
        Err(e) => {
            debug!("No ignore file loaded from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Turn ignore-file content into patterns
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#'))
        .filter(|line| !line.starts_with('!'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_skips_comments_blanks_and_negations() {
        let content = "# build output\n\ntarget/\n  *.log  \n!keep.log\n\r\nsecrets.env\n";
        assert_eq!(parse(content), vec!["target/", "*.log", "secrets.env"]);
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        assert_eq!(parse("b\na\nb\n"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load(dir.path()).is_empty());
    }

    #[test]
    fn test_load_reads_root_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(IGNORE_FILE_NAME), "dist/\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join(IGNORE_FILE_NAME), "*.md\n").unwrap();

        assert_eq!(load(dir.path()), vec!["dist/"]);
    }
}
