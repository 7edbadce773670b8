/*!
 * Errors raised while acquiring a remote repository
 */

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    /// The shallow clone did not complete
    #[error("Failed to clone {url}: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    /// Creating or removing the temporary clone directory failed
    #[error("Temporary clone directory: {0}")]
    TempDir(#[from] io::Error),
}

pub type GitResult<T> = Result<T, GitError>;
