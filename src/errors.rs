// ABOUTME: Error types for the big-deck application
// ABOUTME: Provides structured error handling for deck loading, replay and favicon generation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("HTML parse error: {0}")]
    HtmlError(String),

    #[error("Deck structure error: {0}")]
    StructureError(String),

    #[error("Replay script error on line {line}: {message}")]
    ScriptError { line: usize, message: String },

    #[error("Invalid location: {0}")]
    LocationError(String),

    #[error("SVG error: {0}")]
    SvgError(String),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::HtmlError(err.to_string())
    }
}

impl From<url::ParseError> for DeckError {
    fn from(err: url::ParseError) -> Self {
        DeckError::LocationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
