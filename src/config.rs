// ABOUTME: Configuration module for the big-deck application
// ABOUTME: Provides timing/threshold settings and environment variable handling

use crate::errors::{DeckError, Result};
use crate::favicon::FaviconConfig;
use crate::navigator::NavigatorConfig;
use crate::resources::ResourceFile;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Global configuration for the application
pub struct Config {
    pub scroll_lock_ms: u64,
    pub swipe_threshold_px: f64,
    pub stagger_base_ms: u64,
    pub stagger_step_ms: u64,
    pub entrance_ms: u64,
    pub quiz_reset_ms: u64,
    pub reveal_threshold: f64,
    pub favicon_dir: PathBuf,
    pub ico_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_lock_ms: 800,
            swipe_threshold_px: 50.0,
            stagger_base_ms: 100,
            stagger_step_ms: 100,
            entrance_ms: 600,
            quiz_reset_ms: 5000,
            reveal_threshold: 0.1,
            favicon_dir: PathBuf::from("assets/images"),
            ico_path: PathBuf::from("favicon.ico"),
        }
    }
}

/// Read an environment variable and parse it, falling back to the default on
/// absence or parse failure.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            scroll_lock_ms: env_or("DECK_SCROLL_LOCK_MS", defaults.scroll_lock_ms),
            swipe_threshold_px: env_or("DECK_SWIPE_THRESHOLD", defaults.swipe_threshold_px),
            stagger_base_ms: env_or("DECK_STAGGER_BASE_MS", defaults.stagger_base_ms),
            stagger_step_ms: env_or("DECK_STAGGER_STEP_MS", defaults.stagger_step_ms),
            entrance_ms: env_or("DECK_ENTRANCE_MS", defaults.entrance_ms),
            quiz_reset_ms: env_or("DECK_QUIZ_RESET_MS", defaults.quiz_reset_ms),
            reveal_threshold: env_or("DECK_REVEAL_THRESHOLD", defaults.reveal_threshold),
            favicon_dir: env::var("DECK_FAVICON_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.favicon_dir),
            ico_path: env::var("DECK_ICO_PATH")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.ico_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are usable numbers.
    pub fn validate(&self) -> Result<()> {
        if !self.swipe_threshold_px.is_finite() || self.swipe_threshold_px < 0.0 {
            return Err(DeckError::ConfigError(format!(
                "swipe threshold must be a non-negative number of pixels, got {}",
                self.swipe_threshold_px
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(DeckError::ConfigError(format!(
                "reveal threshold must be between 0 and 1, got {}",
                self.reveal_threshold
            )));
        }
        Ok(())
    }

    /// Get a navigator configuration with the timings from this config
    pub fn get_navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            scroll_lock: Duration::from_millis(self.scroll_lock_ms),
            swipe_threshold: self.swipe_threshold_px,
            stagger_base: Duration::from_millis(self.stagger_base_ms),
            stagger_step: Duration::from_millis(self.stagger_step_ms),
            entrance_duration: Duration::from_millis(self.entrance_ms),
            quiz_reset: Duration::from_millis(self.quiz_reset_ms),
            reveal_threshold: self.reveal_threshold,
            ..NavigatorConfig::default()
        }
    }

    /// Get a favicon configuration, overriding the configured paths when given
    pub fn get_favicon_config(
        &self,
        output_dir: Option<PathBuf>,
        ico_path: Option<PathBuf>,
        logo: Option<String>,
    ) -> FaviconConfig {
        FaviconConfig {
            output_dir: output_dir.unwrap_or_else(|| self.favicon_dir.clone()),
            ico_path: ico_path.unwrap_or_else(|| self.ico_path.clone()),
            logo: logo.map(|path| ResourceFile::new(&path)),
            ..FaviconConfig::default()
        }
    }
}
