//! Exact token counts for OpenAI models via tiktoken's BPE tables

use tiktoken_rs::CoreBPE;

use super::error::{TokenizerError, TokenizerResult};
use super::model::Model;
use super::Tokenizer;

/// BPE tokenizer bound to one model
pub struct OpenAITokenizer {
    model: Model,
    bpe: CoreBPE,
}

impl OpenAITokenizer {
    /// Load the BPE table for `model`
    pub fn new(model: Model) -> TokenizerResult<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model.model_id()).map_err(|e| {
            TokenizerError::EncodingUnavailable {
                model: model.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { model, bpe })
    }
}

impl Tokenizer for OpenAITokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        Ok(self.bpe.encode_ordinary(text).len())
    }

    fn model_context_window(&self) -> Option<usize> {
        Some(self.model.context_window())
    }
}
