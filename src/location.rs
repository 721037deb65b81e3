// ABOUTME: URL location handling for deck deep links
// ABOUTME: Reads and writes the one-based slide number carried in the URL fragment

use crate::errors::{DeckError, Result};
use crate::utils;
use std::path::Path;
use url::Url;

/// The page URL. Its fragment is the shareable slide position.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }

    /// Location of a deck file on disk, as a `file://` URL.
    pub fn for_file(path: &Path) -> Result<Self> {
        let absolute = utils::get_absolute_path(path)?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            DeckError::LocationError(format!("Cannot express {:?} as a file URL", absolute))
        })?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fragment without the leading `#`, if any.
    pub fn hash(&self) -> Option<&str> {
        self.url.fragment().filter(|fragment| !fragment.is_empty())
    }

    /// Replace the fragment. Returns whether the value actually changed,
    /// which is when a browser raises `hashchange`.
    pub fn set_hash(&mut self, fragment: &str) -> bool {
        let fragment = fragment.trim_start_matches('#');
        if self.url.fragment().unwrap_or("") == fragment {
            return false;
        }
        if fragment.is_empty() {
            self.url.set_fragment(None);
        } else {
            self.url.set_fragment(Some(fragment));
        }
        true
    }

    /// Slide position the fragment points at, if it names one of `slide_count` slides.
    pub fn slide(&self, slide_count: usize) -> Option<usize> {
        self.hash()
            .and_then(|fragment| slide_from_fragment(fragment, slide_count))
    }
}

/// Fragment for a zero-based slide position.
pub fn fragment_for_slide(index: usize) -> String {
    (index + 1).to_string()
}

/// Parse a one-based slide fragment (with or without `#`) into a zero-based
/// position.
///
/// Like a lenient integer read, leading whitespace and a `+` sign are skipped
/// and the leading run of digits is used, so `4abc` and `5.0` name slides 4
/// and 5. No digits, zero, or a number past `slide_count` yields `None`.
pub fn slide_from_fragment(fragment: &str, slide_count: usize) -> Option<usize> {
    let text = fragment.strip_prefix('#').unwrap_or(fragment).trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let digits = &text[..end];
    if digits.is_empty() {
        return None;
    }
    // Too many digits to fit is past the end of any deck
    let number: usize = digits.parse().ok()?;
    if number == 0 || number > slide_count {
        return None;
    }
    Some(number - 1)
}
