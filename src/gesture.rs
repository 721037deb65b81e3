// ABOUTME: Touch swipe classification and wheel scroll-lock for the deck navigator
// ABOUTME: Turns raw touch and wheel input into at most one navigation intent per gesture

use crate::input::{Intent, Point};
use crate::scheduler::TaskId;

/// Minimum vertical travel (px) for a touch to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Classify a touch from `start` to `end`.
///
/// The vertical travel must reach `threshold` and dominate the horizontal
/// travel. Moving the finger up advances, moving it down goes back.
pub fn classify_swipe(start: Point, end: Point, threshold: f64) -> Option<Intent> {
    let distance_y = start.y - end.y;
    let distance_x = start.x - end.x;

    if distance_y.abs() < threshold || distance_x.abs() > distance_y.abs() {
        return None;
    }

    if distance_y > 0.0 {
        Some(Intent::Next)
    } else {
        Some(Intent::Previous)
    }
}

/// Holds the touch-start sample until the matching touch-end arrives.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<Point>,
}

impl SwipeTracker {
    pub fn begin(&mut self, at: Point) {
        self.start = Some(at);
    }

    /// Consume the sample and classify the gesture. A touch-end without a
    /// preceding touch-start is ignored.
    pub fn finish(&mut self, at: Point, threshold: f64) -> Option<Intent> {
        let start = self.start.take()?;
        classify_swipe(start, at, threshold)
    }

    pub fn in_progress(&self) -> bool {
        self.start.is_some()
    }
}

/// Wheel debounce: one slide transition per lock window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollLock {
    #[default]
    Idle,
    /// A wheel transition is in flight; `unlock` is the pending timer.
    Locked { unlock: TaskId },
}

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        matches!(self, ScrollLock::Locked { .. })
    }

    /// Direction a wheel delta asks for, if the move stays inside the deck.
    pub fn wheel_intent(delta_y: f64, current: usize, slide_count: usize) -> Option<Intent> {
        if delta_y > 0.0 && current + 1 < slide_count {
            Some(Intent::Next)
        } else if delta_y < 0.0 && current > 0 {
            Some(Intent::Previous)
        } else {
            None
        }
    }
}
