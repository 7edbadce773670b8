/*!
 * Remote repository acquisition
 */

mod error;
mod progress;
mod repository;
mod url;

// Re-export public items
pub use error::{GitError, GitResult};
pub use progress::{GitProgress, ProgressReporter};
pub use repository::ClonedRepository;
pub use url::repo_name;
