//! Tokenizer errors

use thiserror::Error;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug)]
pub enum TokenizerError {
    /// No BPE encoding could be loaded for the model
    #[error("No encoding available for {model}: {reason}")]
    EncodingUnavailable { model: String, reason: String },
}
