//! Crate-wide error type
//!
//! Area errors (git, clipboard, tokenizer) convert into [`CtxError`] with `?`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::git::GitError;
use crate::tokenizer::TokenizerError;

#[derive(Error, Debug)]
pub enum CtxError {
    /// Remote acquisition failed
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Clipboard delivery errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid combination of command-line options
    #[error("Configuration error: {0}")]
    Config(String),

    /// The root of a target could not be walked
    #[error("Cannot walk {path}: {source}")]
    WalkRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Writing the artifact to its destination failed
    #[error("Output error: {0}")]
    Output(String),
}

/// Result alias over [`CtxError`]
pub type Result<T> = std::result::Result<T, CtxError>;

/// `CtxError::$variant(format!(...))`
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CtxError::$error_type(format!($($arg)*))
    };
}

/// Return early with a formatted `CtxError`
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Bail unless the condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
