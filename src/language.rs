/*!
 * Language hints for fenced code blocks
 */

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// File names whose hint does not follow from an extension
static SPECIAL_FILE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("caddyfile", "caddyfile"),
        ("dockerfile", "dockerfile"),
        ("containerfile", "dockerfile"),
        ("makefile", "makefile"),
    ])
});

/// Lower-cased extension (without the dot) to hint
static EXTENSION_HINTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("go", "go"),
        ("md", "markdown"),
        ("markdown", "markdown"),
        ("sh", "bash"),
        ("bash", "bash"),
        ("py", "python"),
        ("js", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("java", "java"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cxx", "cpp"),
        ("hpp", "cpp"),
        ("hxx", "cpp"),
        ("cc", "cpp"),
        ("hh", "cpp"),
        ("cs", "csharp"),
        ("rb", "ruby"),
        ("php", "php"),
        ("swift", "swift"),
        ("kt", "kotlin"),
        ("kts", "kotlin"),
        ("rs", "rust"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("json", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("xml", "xml"),
        ("sql", "sql"),
        ("dockerfile", "dockerfile"),
        ("txt", "text"),
        ("text", "text"),
    ])
});

/// Language hint for a file, derived from its name.
///
/// Special file names win over extensions. Unknown extensions are returned
/// as-is (lower-cased); a file without extension gets an empty hint.
pub fn language_hint(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(hint) = SPECIAL_FILE_NAMES.get(name.as_str()) {
        return hint.to_string();
    }

    let ext = match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => return String::new(),
    };

    EXTENSION_HINTS
        .get(ext)
        .map(|hint| hint.to_string())
        .unwrap_or_else(|| ext.to_string())
}
