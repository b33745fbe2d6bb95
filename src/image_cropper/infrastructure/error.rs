use thiserror::Error;
use crate::domain::error::DomainError;
use std::path::PathBuf;

/// Underlying cause of a failed decode or encode.
#[derive(Error, Debug)]
pub enum CodecCause {
    #[error(transparent)]
    Io(#[from] std::io::Error), // std::io::Error をラップ

    #[error(transparent)]
    ImageLib(#[from] image::ImageError), // image::ImageError をラップ

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Directory error at {}: {source}", path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: CodecCause,
    },

    #[error("Unsupported format {format} in {}", path.display())]
    UnsupportedFormatError { path: PathBuf, format: String },

    #[error("Failed to encode {}: {source}", path.display())]
    EncodeError {
        path: PathBuf,
        #[source]
        source: CodecCause,
    },
}

impl InfrastructureError {
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InfrastructureError::DirectoryError { path: path.into(), source }
    }

    pub fn decode(path: impl Into<PathBuf>, source: impl Into<CodecCause>) -> Self {
        InfrastructureError::DecodeError { path: path.into(), source: source.into() }
    }

    pub fn encode(path: impl Into<PathBuf>, source: impl Into<CodecCause>) -> Self {
        InfrastructureError::EncodeError { path: path.into(), source: source.into() }
    }

    /// Directory-level failures abort a batch; everything else is per file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, InfrastructureError::DirectoryError { .. })
    }
}
