/*!
 * Shallow cloning of remote repositories into temporary directories
 */

use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks};
use tempfile::TempDir;
use tracing::info;

use super::error::{GitError, GitResult};
use super::progress::{GitProgress, ProgressReporter};
use super::url::repo_name;
use crate::types::Target;

/// Prefix of the temporary clone directories
const CLONE_DIR_PREFIX: &str = "ctxcopy-git-";

/// A depth-1 clone living in a temporary directory.
///
/// The directory is removed when the value is dropped or [`close`]d.
///
/// [`close`]: ClonedRepository::close
pub struct ClonedRepository {
    dir: TempDir,
    name: String,
    url: String,
}

impl ClonedRepository {
    /// Shallow-clone `url` into a fresh temporary directory
    pub fn clone_shallow<P: ProgressReporter>(url: &str, progress: Option<&P>) -> GitResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(CLONE_DIR_PREFIX)
            .tempdir()?;

        info!("Cloning {} into temporary directory...", url);

        let mut fetch_options = FetchOptions::new();
        fetch_options.depth(1);

        if let Some(reporter) = progress {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.transfer_progress(|stats| {
                reporter.report(&GitProgress::from(stats));
                true
            });
            fetch_options.remote_callbacks(callbacks);
        }

        git2::build::RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(url, dir.path())
            .map_err(|source| GitError::CloneFailed {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            dir,
            name: repo_name(url),
            url: url.to_string(),
        })
    }

    /// Path of the working tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Readable repository name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote URL the clone came from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Traversal target for the working tree, displayed under the repository name
    pub fn target(&self) -> Target {
        Target::transient(self.dir.path().to_path_buf(), self.name.clone())
    }

    /// Remove the temporary directory
    pub fn close(self) -> GitResult<()> {
        info!("Cleaning up temp directory: {}", self.dir.path().display());
        self.dir.close()?;
        Ok(())
    }
}
