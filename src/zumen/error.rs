use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZumenError {
    #[error("Drawing not found: {0}")]
    DrawingNotFound(String),

    #[error("Unrecognized step folder name: {0}")]
    MalformedName(String),

    #[error("Unknown machine type: {0}")]
    UnknownMachineType(String),

    #[error("Destination file already exists: {}", .0.display())]
    FileCollision(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ZumenError>;
