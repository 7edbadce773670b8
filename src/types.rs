/*!
 * Core types and data structures for ctxcopy
 */

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CtxError, Result};
use crate::utils::clean_display_path;

/// One top-level input processed independently by the traversal engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute path on the host filesystem
    pub root: PathBuf,
    /// Root as shown to the user and used to build display paths
    pub display_root: String,
    /// Whether the root is a directory
    pub is_dir: bool,
    /// Temporary location (a clone directory) whose root is never pattern-tested
    pub transient: bool,
}

impl Target {
    /// Resolve a command-line path into a target.
    ///
    /// Absolute arguments are displayed cleaned; relative ones exactly as typed.
    pub fn from_arg(arg: &str) -> Result<Self> {
        let path = Path::new(arg);
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()?.join(path)
        };

        let metadata = fs::metadata(&root)
            .map_err(|e| CtxError::PathNotFound(format!("{}: {}", arg, e)))?;

        let display_root = if path.is_absolute() {
            clean_display_path(arg)
        } else {
            arg.to_string()
        };

        Ok(Self {
            root,
            display_root,
            is_dir: metadata.is_dir(),
            transient: false,
        })
    }

    /// Target for a temporary directory (a fresh clone) shown as `name`
    pub fn transient(root: PathBuf, name: impl Into<String>) -> Self {
        Self {
            root,
            display_root: name.into(),
            is_dir: true,
            transient: true,
        }
    }
}

/// Why an entry was left out of the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Matched an exclusion pattern
    Excluded(String),
    /// Name starts with a dot
    Hidden,
    /// Content exceeds the size limit (size in bytes)
    TooLarge(u64),
    /// Content contains NUL bytes
    Binary,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded(pattern) => write!(f, "matches exclude pattern '{}'", pattern),
            SkipReason::Hidden => write!(f, "hidden entry"),
            SkipReason::TooLarge(size) => write!(
                f,
                "larger than 1 MiB ({})",
                crate::utils::format_file_size(*size)
            ),
            SkipReason::Binary => write!(f, "likely binary"),
        }
    }
}

/// Result of visiting one filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A block was appended for this file (content length in bytes)
    Serialized(u64),
    /// The entry was deliberately left out
    Skipped(SkipReason),
    /// The entry could not be read
    Errored(String),
}

/// Outcome of one visited entry, keyed by its path relative to the target root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedEntry {
    /// Slash-normalized display path
    pub path: String,
    /// What happened to the entry
    pub outcome: EntryOutcome,
}

/// Everything that happened while processing one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Entries in visitation order
    pub entries: Vec<VisitedEntry>,
}

impl WalkSummary {
    /// Record an entry outcome
    pub fn record(&mut self, path: impl Into<String>, outcome: EntryOutcome) {
        self.entries.push(VisitedEntry {
            path: path.into(),
            outcome,
        });
    }

    /// Display paths of the serialized files, in output order
    pub fn serialized(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Serialized(_)))
            .map(|e| e.path.as_str())
            .collect()
    }

    /// Number of serialized files
    pub fn files_added(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Serialized(_)))
    }

    /// Number of skipped entries
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped(_)))
    }

    /// Number of entries that failed
    pub fn errors(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Errored(_)))
    }

    /// Total content bytes serialized
    pub fn bytes_added(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(|e| match e.outcome {
                EntryOutcome::Serialized(len) => Some(len),
                _ => None,
            })
            .sum()
    }

    /// Merge another summary into this one
    pub fn extend(&mut self, other: WalkSummary) {
        self.entries.extend(other.entries);
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}
