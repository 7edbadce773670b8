//! Model definitions and metadata

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumProperty};

/// Models with a local tokenizer available for exact token counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, ValueEnum, EnumProperty)]
pub enum Model {
    #[value(name = "gpt-3.5-turbo")]
    #[strum(props(model_id = "gpt-3.5-turbo", context_window = "16385"))]
    Gpt35Turbo,

    #[value(name = "gpt-4")]
    #[strum(props(model_id = "gpt-4", context_window = "8192"))]
    Gpt4,

    #[value(name = "gpt-4-turbo")]
    #[strum(props(model_id = "gpt-4-0125-preview", context_window = "128000"))]
    Gpt4Turbo,

    #[value(name = "gpt-4o")]
    #[strum(props(model_id = "gpt-4o", context_window = "128000"))]
    Gpt4o,
}

impl Model {
    /// Get the context window size for this model
    pub fn context_window(&self) -> usize {
        self.get_str("context_window")
            .and_then(|w| w.parse().ok())
            .unwrap_or(0)
    }

    /// Get the model identifier understood by the tokenizer
    pub fn model_id(&self) -> &'static str {
        self.get_str("model_id").unwrap_or("unknown")
    }
}
