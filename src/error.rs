// tentcard-pdf: error types shared by the library and the CLI

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read names file: {0}")]
    NamesError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StoreError(String),
    #[error("No saved nameplate with id {0}")]
    HistoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
