/*!
 * Target traversal: exclusion, hidden-entry pruning and serialization
 */

use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{CtxError, Result};
use crate::policy::ExclusionPolicy;
use crate::types::{EntryOutcome, SkipReason, Target, WalkSummary};
use crate::utils::{join_display_path, to_slash_path};
use crate::writer::{BlockWriter, OutputBuffer};

/// Version-control directory pruned without a skip notice
const VCS_DIR: &str = ".git";

/// Walks targets and feeds surviving files to the block writer
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    writer: BlockWriter,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(writer: BlockWriter) -> Self {
        Self { writer }
    }

    /// Block writer used for surviving files
    pub fn writer(&self) -> &BlockWriter {
        &self.writer
    }

    /// Process one target under `policy`.
    ///
    /// The target's display root is checked against the policy first; an
    /// excluded root produces a single skipped entry and no traversal.
    pub fn process_target(
        &self,
        target: &Target,
        policy: &ExclusionPolicy,
        buffer: &mut OutputBuffer,
    ) -> Result<WalkSummary> {
        if let Some(pattern) = policy.excludes_root(target) {
            info!(
                "Skipping path {} (matches exclude pattern '{}')",
                target.display_root, pattern
            );
            let mut summary = WalkSummary::default();
            summary.record(
                target.display_root.clone(),
                EntryOutcome::Skipped(SkipReason::Excluded(pattern.to_string())),
            );
            return Ok(summary);
        }

        if target.is_dir {
            self.walk(target, policy, buffer)
        } else {
            let mut summary = WalkSummary::default();
            let outcome = self
                .writer
                .serialize(&target.root, &target.display_root, buffer);
            summary.record(target.display_root.clone(), outcome);
            Ok(summary)
        }
    }

    /// Walk a directory target depth-first, siblings in file-name order.
    ///
    /// Excluded and hidden directories are pruned without descending into
    /// them. Errors below the root are recorded and the walk goes on; an
    /// error on the root itself aborts the walk.
    pub fn walk(
        &self,
        target: &Target,
        policy: &ExclusionPolicy,
        buffer: &mut OutputBuffer,
    ) -> Result<WalkSummary> {
        info!("Processing directory: {}", target.display_root);

        let mut summary = WalkSummary::default();
        let mut entries = WalkDir::new(&target.root)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(CtxError::WalkRoot {
                        path: target.root.clone(),
                        source: err,
                    });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| display_path_of(target, p))
                        .unwrap_or_else(|| target.display_root.clone());
                    warn!("Error accessing {}: {}", path, err);
                    summary.record(path, EntryOutcome::Errored(err.to_string()));
                    continue;
                }
            };

            // The root anchors the walk and is never tested or serialized
            if entry.depth() == 0 {
                continue;
            }

            let relative = match entry.path().strip_prefix(&target.root) {
                Ok(rel) => to_slash_path(rel),
                Err(e) => {
                    warn!(
                        "Error calculating relative path for {}: {}. Skipping.",
                        entry.path().display(),
                        e
                    );
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().is_dir();
            let display_path = join_display_path(&target.display_root, &relative);

            if let Some(pattern) = policy.is_excluded(&relative) {
                if name != VCS_DIR {
                    info!("Skipping excluded path: {} (pattern: '{}')", relative, pattern);
                }
                if is_dir {
                    entries.skip_current_dir();
                }
                summary.record(
                    display_path,
                    EntryOutcome::Skipped(SkipReason::Excluded(pattern.to_string())),
                );
                continue;
            }

            if name.starts_with('.') {
                if is_dir {
                    if name != VCS_DIR {
                        info!("Skipping hidden directory: {}", relative);
                    }
                    entries.skip_current_dir();
                } else {
                    info!("Skipping hidden file: {}", relative);
                }
                summary.record(display_path, EntryOutcome::Skipped(SkipReason::Hidden));
                continue;
            }

            if is_dir {
                continue;
            }

            let outcome = self.writer.serialize(entry.path(), &display_path, buffer);
            summary.record(display_path, outcome);
        }

        Ok(summary)
    }
}

/// Display path for an absolute path found under `target`
fn display_path_of(target: &Target, path: &Path) -> String {
    match path.strip_prefix(&target.root) {
        Ok(rel) => join_display_path(&target.display_root, &to_slash_path(rel)),
        Err(_) => path.display().to_string(),
    }
}
