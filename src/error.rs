use std::path::PathBuf;

/// The completion service could not be reached with valid credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("no API key configured: set OPENAI_API_KEY or OPENAI_API_KEY_FILE")]
    MissingApiKey,
    #[error("failed to read API key file {path:?}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("API key file {0:?} is empty")]
    EmptyKeyFile(PathBuf),
    #[error("API key rejected: {0}")]
    Rejected(String),
}

/// A story could not be produced by the completion service.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error("completion request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("completion response contained no candidates")]
    NoCandidates,
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, GenerationError::Authentication(_))
    }
}
