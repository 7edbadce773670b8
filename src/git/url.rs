/*!
 * Repository naming from clone URLs
 */

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// scp-like syntax accepted by git: `user@host:path`
static SCP_LIKE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[^:/]+:(.+)$").unwrap());

/// Name used when nothing sensible can be derived from a URL
const FALLBACK_NAME: &str = "repo";

/// Readable repository name for a URL, used as the display root of a clone.
///
/// The last path segment with trailing `/` and `.git` removed, or `"repo"`
/// when that leaves nothing. Accepts URLs with a scheme, scp-like
/// `git@host:owner/name` addresses and plain paths.
pub fn repo_name(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => match SCP_LIKE_REGEX.captures(url) {
            Some(captures) => captures[1].to_string(),
            None => url.to_string(),
        },
    };

    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}
