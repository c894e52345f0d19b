use blog_kit_content::ContentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("OPENAI_API_KEY is not set; add it to the environment or a .env file")]
    MissingCredentials,
    #[error("Translation service error: {0}")]
    Service(String),
    #[error("Translation service returned an empty response")]
    EmptyResponse,
    #[error("Target already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Fenced code blocks changed during translation: {0}")]
    CodeBlocksChanged(String),
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Service(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
