// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while mining one project
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("problem while cloning repository from URL {url}: {message}")]
    Clone { url: String, message: String },

    #[error("refactoring detection failed: {0}")]
    Detection(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("no issue tracker found for {0}")]
    Resolution(String),

    #[error("output directory {} already exists", .0.display())]
    AlreadyMined(PathBuf),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MinerError>;
