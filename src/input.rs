// ABOUTME: Input events and the input source interface for the deck navigator
// ABOUTME: Lets a browser shim or a test harness feed synthetic events to subscribers

use crate::document::ElementId;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Keys the navigator reacts to. Anything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Digit(u8),
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            " " | "Space" | "Spacebar" => Key::Space,
            _ => match key.as_bytes() {
                [digit @ b'0'..=b'9'] => Key::Digit(digit - b'0'),
                _ => Key::Other(key.to_string()),
            },
        }
    }

    /// The navigation intent a key maps to for a deck of `slide_count` slides.
    pub fn intent(&self, slide_count: usize) -> Option<Intent> {
        match self {
            Key::ArrowDown | Key::ArrowRight | Key::Space => Some(Intent::Next),
            Key::ArrowUp | Key::ArrowLeft => Some(Intent::Previous),
            Key::Digit(digit @ 1..=9) => {
                let index = (*digit - 1) as usize;
                (index < slide_count).then_some(Intent::Goto(index))
            }
            _ => None,
        }
    }
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Key::from_dom(s))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Space => f.write_str("Space"),
            Key::Digit(digit) => write!(f, "{}", digit),
            Key::Other(key) => f.write_str(key),
        }
    }
}

/// What an input asks the navigator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Previous,
    Goto(usize),
}

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything a deck page can deliver to the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(Key),
    Wheel { delta_y: f64 },
    TouchStart(Point),
    TouchEnd(Point),
    DotClick(usize),
    /// The location fragment changed to this value (without `#`).
    HashChange(String),
    QuizClick { slide: usize, option: usize },
    /// An observed element's visible ratio changed.
    Intersection { element: ElementId, ratio: f64 },
}

/// Identifies one subscription on an [`InputSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler = Box<dyn FnMut(&InputEvent) + Send>;

/// Something that produces input events for subscribers.
pub trait InputSource {
    fn subscribe(&mut self, handler: Handler) -> SubscriptionId;

    /// Remove a subscription. Returns false if it was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// An input source driven by hand, for tests and script replay.
#[derive(Default)]
pub struct SyntheticInput {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

impl SyntheticInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every subscriber, in subscription order.
    pub fn emit(&mut self, event: &InputEvent) {
        debug!("Emitting {:?} to {} subscribers", event, self.handlers.len());
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl InputSource for SyntheticInput {
    fn subscribe(&mut self, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }
}
