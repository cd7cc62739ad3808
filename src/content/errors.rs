//! Error types for the content API client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ContentError {
    /// Short label for status lines
    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::Transport(_) => "network",
            ContentError::Status { .. } => "http",
            ContentError::Decode(_) | ContentError::Shape(_) => "response",
            ContentError::Graphql(_) => "graphql",
            ContentError::Config(_) => "config",
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
