/*!
 * Glob pattern matching for exclusion rules
 *
 * Matching is delegated to `glob-match`, which gives the following semantics:
 * `*` and `?` never cross a `/`, `**` spans any number of segments, bracket
 * classes (`[abc]`, `[!abc]`, `[a-z]`) and brace alternation (`{a,b}`) are
 * supported, and matching is case-sensitive. A malformed pattern, one with
 * an unclosed `[` class or unbalanced `{`/`}` braces, never matches.
 */

use glob_match::glob_match;

/// Check whether `pattern` excludes the entry at `relative_path`.
///
/// `relative_path` must already be slash-normalized; `base_name` is its last
/// component.
///
/// * A pattern containing `/` is matched against the full relative path only.
/// * A pattern without `/` is matched against the full path and, separately,
///   against the base name, so `*.log` excludes `a/b/c.log`.
/// * A pattern ending in `/` is stripped of that slash and both checks above
///   are repeated with the stripped pattern.
pub fn matches(pattern: &str, relative_path: &str, base_name: &str) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() || !is_well_formed(pattern) {
        return false;
    }

    if match_scoped(pattern, relative_path, base_name) {
        return true;
    }

    match pattern.strip_suffix('/') {
        Some(dir_pattern) if !dir_pattern.is_empty() => {
            match_scoped(dir_pattern, relative_path, base_name)
        }
        _ => false,
    }
}

/// Whether every `[` class is closed and every `{` has its `}`.
///
/// `glob-match` can report a match for unbalanced patterns such as `{a,b`.
/// A backslash escapes the next character and a `]` outside a class is a
/// literal.
fn is_well_formed(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    let mut in_class = false;
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            ']' if in_class => in_class = false,
            _ if in_class => {}
            '[' => in_class = true,
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }

    !in_class && depth == 0
}

/// Full-path match, plus the base-name match for slash-free patterns
fn match_scoped(pattern: &str, relative_path: &str, base_name: &str) -> bool {
    if glob_match(pattern, relative_path) {
        return true;
    }

    !pattern.contains('/') && glob_match(pattern, base_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(pattern: &str, path: &str) -> bool {
        let base = path.rsplit('/').next().unwrap_or(path);
        matches(pattern, path, base)
    }

    #[test]
    fn test_name_pattern_matches_at_any_depth() {
        assert!(check("*.log", "c.log"));
        assert!(check("*.log", "a/b/c.log"));
        assert!(check("node_modules", "web/node_modules"));
        assert!(!check("*.log", "a/b/c.txt"));
    }

    #[test]
    fn test_path_pattern_only_matches_full_path() {
        assert!(check("src/*.log", "src/x.log"));
        assert!(!check("src/*.log", "other/x.log"));
        // The base name alone is never consulted for path-scoped patterns
        assert!(!check("src/x.log", "other/src/x.log"));
    }

    #[test]
    fn test_star_does_not_cross_segments() {
        assert!(!check("src/*", "src/a/b.rs"));
        assert!(check("src/*", "src/a"));
        assert!(check("src/**/*.rs", "src/a/b.rs"));
        assert!(check("src/**", "src/a/b/c.rs"));
    }

    #[test]
    fn test_directory_suffix_pattern() {
        assert!(check("build/", "build"));
        assert!(check("build/", "crates/app/build"));
        assert!(check("dist/assets/", "dist/assets"));
        assert!(!check("dist/assets/", "web/dist/assets"));
        assert!(!check("build/", "builder"));
    }

    #[test]
    fn test_character_classes_and_alternation() {
        assert!(check("*.[ch]", "lib/util.h"));
        assert!(!check("*.[ch]", "lib/util.o"));
        assert!(check("*.{png,jpg}", "assets/logo.jpg"));
        assert!(check("?.txt", "a.txt"));
        assert!(!check("?.txt", "ab.txt"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!check("*.LOG", "a.log"));
        assert!(check("Makefile", "Makefile"));
        assert!(!check("makefile", "Makefile"));
    }

    #[test]
    fn test_blank_and_malformed_patterns_never_match() {
        assert!(!check("", "a.txt"));
        assert!(!check("   ", "a.txt"));
        assert!(!check("/", "a.txt"));
        assert!(!check("[unclosed", "src/main.rs"));
    }

    #[test]
    fn test_unbalanced_braces_never_match() {
        assert!(!check("{a,b", "a/b"));
        assert!(!check("*.{rs,toml", "main.rs"));
        assert!(!check("a}", "a}"));
        assert!(!check("src/[ab", "src/a"));
        assert!(check("{a,b}/c", "b/c"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(check("  *.tmp ", "cache/a.tmp"));
    }
}
