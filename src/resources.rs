// ABOUTME: Resource handling for the big-deck application
// ABOUTME: Loads local or remote source files such as the favicon logo SVG

use crate::errors::{DeckError, Result};
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Get the raw bytes of the resource.
    /// Remote resources are fetched over HTTP, local ones read from disk.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        if self.is_remote {
            self.fetch_remote_bytes()
        } else {
            self.read_local_bytes()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_bytes(&self) -> Result<Vec<u8>> {
        info!("Fetching remote resource: {}", self.path);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(DeckError::FetchError)?;

        // Try up to 3 times with increasing backoff
        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) => {
                    if response.status().is_success() {
                        return response
                            .bytes()
                            .map(|body| body.to_vec())
                            .map_err(DeckError::FetchError);
                    }
                    let status = response.status();
                    last_error = Some(DeckError::ValidationError(format!("HTTP error: {}", status)));
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local_bytes(&self) -> Result<Vec<u8>> {
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }

        fs::read(path).map_err(DeckError::FileReadError)
    }
}
