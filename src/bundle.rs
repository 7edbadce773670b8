/*!
 * Assembly of the artifact: target blocks, then the prompt, then the
 * follow-up file
 */

use tracing::info;

use crate::bail;
use crate::error::Result;
use crate::policy::{normalize_patterns, ExclusionPolicy};
use crate::scanner::Scanner;
use crate::types::{Target, WalkSummary};
use crate::writer::OutputBuffer;

/// The artifact under construction and what went into it
#[derive(Debug, Default)]
pub struct Bundle {
    buffer: OutputBuffer,
    summary: WalkSummary,
    targets: usize,
}

impl Bundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact built so far
    pub fn buffer(&self) -> &OutputBuffer {
        &self.buffer
    }

    /// Outcomes of every visited entry
    pub fn summary(&self) -> &WalkSummary {
        &self.summary
    }

    /// Number of targets processed
    pub fn targets(&self) -> usize {
        self.targets
    }

    /// Split into the artifact and the entry outcomes
    pub fn into_parts(self) -> (OutputBuffer, WalkSummary, usize) {
        (self.buffer, self.summary, self.targets)
    }
}

/// Feeds targets into a [`Bundle`] under the global exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct Bundler {
    scanner: Scanner,
    exclude_patterns: Vec<String>,
}

impl Bundler {
    /// Create a bundler with the given global exclusion patterns
    pub fn new(exclude_patterns: Vec<String>) -> Self {
        Self {
            scanner: Scanner::default(),
            exclude_patterns: normalize_patterns(exclude_patterns),
        }
    }

    /// Process one target with its own exclusion policy
    pub fn add_target(&self, target: &Target, bundle: &mut Bundle) -> Result<()> {
        let policy = ExclusionPolicy::build(&self.exclude_patterns, target);
        let summary = self
            .scanner
            .process_target(target, &policy, &mut bundle.buffer)?;

        bundle.summary.extend(summary);
        bundle.targets += 1;
        Ok(())
    }

    /// Resolve a command-line path and process it
    pub fn add_path(&self, arg: &str, bundle: &mut Bundle) -> Result<()> {
        let target = Target::from_arg(arg)?;
        self.add_target(&target, bundle)
    }

    /// Append the prompt text; an empty prompt is ignored
    pub fn add_prompt(&self, prompt: &str, bundle: &mut Bundle) {
        if prompt.is_empty() {
            return;
        }
        bundle.buffer.append_text(prompt);
        info!("Appended prompt text.");
    }

    /// Append a follow-up file as a block.
    ///
    /// A blank line precedes the file's own block separator. The file goes
    /// through the size and binary gates but not the exclusion patterns.
    pub fn add_follow_up(&self, arg: &str, bundle: &mut Bundle) -> Result<()> {
        let target = Target::from_arg(arg)?;
        if target.is_dir {
            bail!(Config, "Path for -f ({}) is a directory, must be a file", arg);
        }

        bundle.buffer.push_separator();
        let outcome =
            self.scanner
                .writer()
                .serialize(&target.root, &target.display_root, &mut bundle.buffer);
        bundle.summary.record(target.display_root, outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CtxError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_layout() {
        let bundler = Bundler::default();

        let mut bundle = Bundle::new();
        bundler.add_prompt("Explain this", &mut bundle);
        assert_eq!(bundle.buffer().as_bytes(), b"Explain this");

        let mut bundle = Bundle::new();
        bundle.buffer.append_block("", "a", b"x");
        bundler.add_prompt("", &mut bundle);
        bundler.add_prompt("Explain", &mut bundle);
        assert_eq!(bundle.buffer().as_bytes(), b"```a\nx\n```\n\n\nExplain");
    }

    #[test]
    fn test_follow_up_after_prompt() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("todo.md");
        fs::write(&file, "- item\n").unwrap();
        let arg = file.to_str().unwrap();

        let bundler = Bundler::default();
        let mut bundle = Bundle::new();
        bundler.add_prompt("Do it", &mut bundle);
        bundler.add_follow_up(arg, &mut bundle).unwrap();

        let expected = format!("Do it\n\n\n\n```markdown {}\n- item\n```\n", arg);
        assert_eq!(bundle.buffer().to_string_lossy(), expected);
        assert_eq!(bundle.summary().files_added(), 1);
        assert_eq!(bundle.targets(), 0);
    }

    #[test]
    fn test_follow_up_alone_has_no_leading_separator() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hi").unwrap();

        let mut bundle = Bundle::new();
        Bundler::default()
            .add_follow_up(file.to_str().unwrap(), &mut bundle)
            .unwrap();

        assert!(bundle.buffer().as_bytes().starts_with(b"```"));
    }

    #[test]
    fn test_follow_up_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let mut bundle = Bundle::new();
        let result = Bundler::default().add_follow_up(dir.path().to_str().unwrap(), &mut bundle);

        assert!(matches!(result, Err(CtxError::Config(_))));
        assert!(bundle.buffer().is_empty());
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let mut bundle = Bundle::new();
        let result = Bundler::default().add_path("/definitely/not/here/ctxcopy", &mut bundle);

        assert!(matches!(result, Err(CtxError::PathNotFound(_))));
        assert_eq!(bundle.targets(), 0);
    }

    #[test]
    fn test_targets_share_one_buffer() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        fs::write(dir.path().join("b.py"), "b = 1\n").unwrap();

        let a = dir.path().join("a.rs");
        let b = dir.path().join("b.py");
        let bundler = Bundler::new(vec![" ".into()]);
        let mut bundle = Bundle::new();
        bundler.add_path(a.to_str().unwrap(), &mut bundle).unwrap();
        bundler.add_path(b.to_str().unwrap(), &mut bundle).unwrap();

        let expected = format!(
            "```rust {}\nfn a() {{}}\n```\n\n\n```python {}\nb = 1\n```\n",
            a.display(),
            b.display()
        );
        assert_eq!(bundle.buffer().to_string_lossy(), expected);
        assert_eq!(bundle.targets(), 2);
        assert_eq!(bundle.summary().files_added(), 2);
    }
}
