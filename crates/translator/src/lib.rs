//! Machine translation of articles through an OpenAI-compatible chat API.

pub mod client;
pub mod disclaimer;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod verify;

pub use client::{ClientConfig, GenerationRequest, OpenAiClient, TextGenerator};
pub use error::{Result, TranslateError};
pub use orchestrator::{ArticleTranslator, TranslationReport};
