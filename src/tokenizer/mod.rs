//! Token counting for the assembled artifact
//!
//! A character-class heuristic estimate is always computed; exact counts for
//! OpenAI models come from a local BPE tokenizer.

mod error;
mod heuristic;
mod model;
mod openai;

// Re-exports for public API
pub use error::{TokenizerError, TokenizerResult};
pub use heuristic::{estimate_tokens, TokenEstimate};
pub use model::Model;
pub use openai::OpenAITokenizer;

/// Trait defining the interface for tokenizers
pub trait Tokenizer {
    /// Count tokens in the given text
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize>;

    /// Get the context window size for this model, if known
    fn model_context_window(&self) -> Option<usize>;
}

/// Create the exact tokenizer for `model`
pub fn create_tokenizer(model: Model) -> TokenizerResult<Box<dyn Tokenizer>> {
    Ok(Box::new(OpenAITokenizer::new(model)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tokenizer_reports_context_window() {
        let tokenizer = create_tokenizer(Model::Gpt35Turbo).unwrap();
        assert_eq!(tokenizer.model_context_window(), Some(16385));
        assert_eq!(tokenizer.count_tokens("").unwrap(), 0);
    }
}
