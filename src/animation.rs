// ABOUTME: Inline style states for slide elements and the staggered entrance plan
// ABOUTME: Mirrors the opacity/transform/transition writes a deck applies to slide content

use std::fmt;
use std::time::Duration;

/// Vertical offset (px) an element starts from before sliding into place.
pub const ENTRANCE_OFFSET_PX: f32 = 20.0;

/// A CSS transition applied to opacity and transform together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.duration.as_secs_f32();
        write!(f, "opacity {secs}s ease, transform {secs}s ease")
    }
}

/// The inline style a deck script controls on a content element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub opacity: f32,
    pub translate_y: f32,
    pub transition: Option<Transition>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_y: 0.0,
            transition: None,
        }
    }
}

impl ElementStyle {
    /// Pre-animation state: invisible, pushed down, transitions disabled.
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            translate_y: ENTRANCE_OFFSET_PX,
            transition: None,
        }
    }

    /// Final state, eased in over `duration`.
    pub fn entered(duration: Duration) -> Self {
        Self {
            opacity: 1.0,
            translate_y: 0.0,
            transition: Some(Transition { duration }),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.opacity == 0.0
    }

    /// Render as an inline `style` attribute value.
    pub fn to_css(&self) -> String {
        let transition = match &self.transition {
            Some(t) => t.to_string(),
            None => "none".to_string(),
        };
        format!(
            "opacity: {}; transform: translateY({}px); transition: {}",
            self.opacity, self.translate_y, transition
        )
    }
}

/// Delays for a staggered entrance: `base + step * position` for each element.
#[derive(Debug, Clone, Copy)]
pub struct Stagger {
    pub base: Duration,
    pub step: Duration,
}

impl Stagger {
    pub fn delay(&self, position: usize) -> Duration {
        self.base + self.step * position as u32
    }

    pub fn delays(&self, count: usize) -> impl Iterator<Item = Duration> + '_ {
        (0..count).map(move |position| self.delay(position))
    }
}
