// ABOUTME: Library module for the big-deck program.
// ABOUTME: Contains the headless deck navigator, replay support and favicon generation.

// Reexport modules
pub mod animation;
pub mod config;
pub mod document;
pub mod errors;
pub mod favicon;
pub mod gesture;
pub mod input;
pub mod location;
pub mod navigator;
pub mod quiz;
pub mod render;
pub mod resources;
pub mod reveal;
pub mod scheduler;
pub mod script;
pub mod session;
pub mod utils;

// Reexport common types and functions
pub use config::Config;
pub use document::{Document, Element, ElementId, Slide};
pub use errors::{DeckError, Result};
pub use favicon::{FaviconConfig, generate_favicons};
pub use input::{InputEvent, InputSource, Intent, Key, Point, SyntheticInput};
pub use location::Location;
pub use navigator::{EventOutcome, Navigator, NavigatorConfig, NavigatorStats};
pub use quiz::{Quiz, QuizMessages, QuizOption, Verdict};
pub use render::{render_outline, render_status};
pub use resources::ResourceFile;
pub use script::{ScriptStep, load_script, parse_script};
pub use session::Session;

#[cfg(test)]
mod tests;
