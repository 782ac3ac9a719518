use crate::resource::ArtifactKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to generate {kind}: {message}")]
    GenerationFailed { kind: ArtifactKind, message: String },

    #[error("Failed to patch migration {}: {source}", .path.display())]
    Patch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl ScaffoldError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn generation_failed(kind: ArtifactKind, message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            kind,
            message: message.into(),
        }
    }

    pub fn patch(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Patch {
            path: path.into(),
            source,
        }
    }
}
