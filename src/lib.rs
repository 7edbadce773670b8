/*!
 * ctxcopy - Bundle source files into markdown code blocks for LLM context
 *
 * This library walks files, directories and shallow git clones, filters
 * them through exclusion patterns, and renders every surviving text file as
 * a fenced markdown block labelled with its path.
 */

pub mod bundle;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod git;
pub mod ignore_file;
pub mod language;
pub mod pattern;
pub mod policy;
pub mod report;
pub mod scanner;
pub mod tokenizer;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use bundle::{Bundle, Bundler};
pub use config::{Config, Destination};
pub use error::{CtxError, Result};
pub use policy::ExclusionPolicy;
pub use report::{Reporter, RunReport};
pub use scanner::Scanner;
pub use types::{EntryOutcome, SkipReason, Target, WalkSummary};
pub use utils::format_file_size;
pub use writer::{BlockWriter, OutputBuffer};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
