// ABOUTME: Scroll-reveal observer for deck content
// ABOUTME: Marks observed elements as revealed once enough of them enters the viewport

use crate::document::ElementId;
use std::collections::BTreeSet;

/// Visible fraction at which an element counts as in view.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;

/// Watches a fixed set of elements for viewport intersection.
///
/// Reveal is one-way: leaving the viewport never undoes it.
#[derive(Debug, Clone)]
pub struct RevealObserver {
    threshold: f64,
    observed: BTreeSet<ElementId>,
}

impl RevealObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, element: ElementId) {
        self.observed.insert(element);
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    pub fn observed(&self) -> usize {
        self.observed.len()
    }

    /// Whether an intersection report should reveal `element`.
    pub fn should_reveal(&self, element: ElementId, ratio: f64) -> bool {
        self.is_observing(element) && ratio > 0.0 && ratio >= self.threshold
    }
}
