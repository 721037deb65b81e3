// ABOUTME: Presentation navigator for single-page slide decks
// ABOUTME: Owns the current slide and maps keyboard, wheel, touch, dot and hash input onto it

use crate::animation::{ElementStyle, Stagger};
use crate::document::{Document, ElementId};
use crate::gesture::{ScrollLock, SwipeTracker, DEFAULT_SWIPE_THRESHOLD};
use crate::input::{InputEvent, Intent};
use crate::location::{fragment_for_slide, slide_from_fragment, Location};
use crate::quiz::QuizMessages;
use crate::reveal::{RevealObserver, DEFAULT_REVEAL_THRESHOLD};
use crate::scheduler::{Scheduler, TaskId};
use log::{debug, info};
use std::collections::VecDeque;
use std::time::Duration;

/// Timings and thresholds for the navigator
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    pub scroll_lock: Duration,
    pub swipe_threshold: f64,
    pub stagger_base: Duration,
    pub stagger_step: Duration,
    pub entrance_duration: Duration,
    pub quiz_reset: Duration,
    pub reveal_threshold: f64,
    pub quiz_messages: QuizMessages,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            scroll_lock: Duration::from_millis(800),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            stagger_base: Duration::from_millis(100),
            stagger_step: Duration::from_millis(100),
            entrance_duration: Duration::from_millis(600),
            quiz_reset: Duration::from_millis(5000),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            quiz_messages: QuizMessages::default(),
        }
    }
}

impl NavigatorConfig {
    fn stagger(&self) -> Stagger {
        Stagger {
            base: self.stagger_base,
            step: self.stagger_step,
        }
    }
}

/// Deferred work the navigator schedules on its clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Unlock,
    EnterElement(ElementId),
    ResetQuiz(usize),
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// A slide transition happened.
    pub moved: bool,
    /// The page's default action (scrolling) should be suppressed.
    pub default_prevented: bool,
}

impl EventOutcome {
    fn moved(moved: bool, default_prevented: bool) -> Self {
        Self {
            moved,
            default_prevented,
        }
    }
}

/// Counters for observing navigator activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigatorStats {
    pub transitions: u64,
    pub entrance_runs: u64,
    pub ignored_events: u64,
}

/// The presentation navigator.
///
/// Every input channel funnels into one slide mutator, which clamps the
/// requested position and then updates the location hash, slide and dot
/// markers, the progress bar and the entrance animation, in that order.
/// Deferred work (scroll unlock, staggered entrances, quiz resets) runs on a
/// virtual clock advanced with [`Navigator::advance`].
pub struct Navigator {
    document: Document,
    location: Location,
    config: NavigatorConfig,
    current: usize,
    scroll_lock: ScrollLock,
    swipe: SwipeTracker,
    scheduler: Scheduler<Task>,
    reveal: RevealObserver,
    entrance_tasks: Vec<TaskId>,
    raised: VecDeque<InputEvent>,
    stats: NavigatorStats,
}

impl Navigator {
    /// Set up the deck: generate dots, show the slide named by the location
    /// (or the first), animate it in and start observing reveal targets.
    pub fn new(document: Document, location: Location, config: NavigatorConfig) -> Self {
        let slide_count = document.len();
        let mut reveal = RevealObserver::new(config.reveal_threshold);
        for element in document.reveal_targets() {
            reveal.observe(element);
        }

        let mut navigator = Self {
            document,
            location,
            config,
            current: 0,
            scroll_lock: ScrollLock::Idle,
            swipe: SwipeTracker::default(),
            scheduler: Scheduler::new(),
            reveal,
            entrance_tasks: Vec::new(),
            raised: VecDeque::new(),
            stats: NavigatorStats::default(),
        };

        navigator.document.generate_dots();
        let start = navigator.location.slide(slide_count).unwrap_or(0);
        info!(
            "Starting deck with {} slides at slide {} ({} reveal targets)",
            slide_count,
            start + 1,
            navigator.reveal.observed()
        );
        navigator.set_active(start);
        navigator
    }

    pub fn current_slide(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.document.len()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn stats(&self) -> NavigatorStats {
        self.stats
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    pub fn is_swipe_in_progress(&self) -> bool {
        self.swipe.in_progress()
    }

    /// Scheduled tasks that have not fired yet.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Entrance animation steps that have not fired yet.
    pub fn pending_entrances(&self) -> usize {
        self.entrance_tasks.len()
    }

    /// Show the slide at `index`, clamped into the deck.
    pub fn go_to_slide(&mut self, index: isize) {
        self.navigate(index);
        self.process_raised();
    }

    /// Advance one slide. Returns false (and does nothing) on the last slide.
    pub fn next_slide(&mut self) -> bool {
        let moved = self.apply(Intent::Next);
        self.process_raised();
        moved
    }

    /// Go back one slide. Returns false (and does nothing) on the first slide.
    pub fn prev_slide(&mut self) -> bool {
        let moved = self.apply(Intent::Previous);
        self.process_raised();
        moved
    }

    /// Handle one input event to completion, including any hash change the
    /// navigation itself raised.
    pub fn dispatch(&mut self, event: &InputEvent) -> EventOutcome {
        let outcome = self.handle(event);
        self.process_raised();
        outcome
    }

    /// Move the clock forward by `by`, firing every task that comes due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        self.advance_to(until);
    }

    /// Move the clock to `until`, firing every task due by then in order.
    pub fn advance_to(&mut self, until: Duration) {
        self.process_raised();
        while let Some((id, task)) = self.scheduler.pop_due(until) {
            self.run(id, task);
            self.process_raised();
        }
    }

    fn handle(&mut self, event: &InputEvent) -> EventOutcome {
        let slide_count = self.slide_count();
        match event {
            InputEvent::Key(key) => match key.intent(slide_count) {
                Some(Intent::Goto(index)) => EventOutcome::moved(self.apply(Intent::Goto(index)), false),
                Some(intent) => EventOutcome::moved(self.apply(intent), true),
                None => self.ignore(event),
            },
            InputEvent::Wheel { delta_y } => self.handle_wheel(*delta_y),
            InputEvent::TouchStart(point) => {
                self.swipe.begin(*point);
                EventOutcome::default()
            }
            InputEvent::TouchEnd(point) => {
                match self.swipe.finish(*point, self.config.swipe_threshold) {
                    Some(intent) => EventOutcome::moved(self.apply(intent), false),
                    None => self.ignore(event),
                }
            }
            InputEvent::DotClick(index) if *index < slide_count => {
                EventOutcome::moved(self.apply(Intent::Goto(*index)), false)
            }
            InputEvent::HashChange(fragment) => self.handle_hash_change(fragment),
            InputEvent::QuizClick { slide, option } => self.handle_quiz_click(*slide, *option),
            InputEvent::Intersection { element, ratio } => {
                if !self.reveal.should_reveal(*element, *ratio) {
                    return self.ignore(event);
                }
                if let Some(target) = self.document.element_mut(*element) {
                    if !target.revealed {
                        debug!("Revealing element {:?}", element);
                        target.revealed = true;
                    }
                }
                EventOutcome::default()
            }
            _ => self.ignore(event),
        }
    }

    fn ignore(&mut self, event: &InputEvent) -> EventOutcome {
        debug!("Ignoring {:?}", event);
        self.stats.ignored_events += 1;
        EventOutcome::default()
    }

    fn handle_wheel(&mut self, delta_y: f64) -> EventOutcome {
        if self.scroll_lock.is_locked() {
            debug!("Wheel ignored while scroll-locked");
            self.stats.ignored_events += 1;
            return EventOutcome::default();
        }

        match ScrollLock::wheel_intent(delta_y, self.current, self.slide_count()) {
            Some(intent) => {
                let unlock = self.scheduler.schedule(self.config.scroll_lock, Task::Unlock);
                self.scroll_lock = ScrollLock::Locked { unlock };
                EventOutcome::moved(self.apply(intent), true)
            }
            None => EventOutcome::moved(false, true),
        }
    }

    fn handle_hash_change(&mut self, fragment: &str) -> EventOutcome {
        // The page already shows the new fragment; mirror it without re-raising
        self.location.set_hash(fragment);

        match slide_from_fragment(fragment, self.slide_count()) {
            Some(index) if index == self.current => {
                debug!("Hash #{} already shown", fragment);
                EventOutcome::default()
            }
            Some(index) => EventOutcome::moved(self.apply(Intent::Goto(index)), false),
            None => {
                debug!("Hash {:?} does not name a slide", fragment);
                self.stats.ignored_events += 1;
                EventOutcome::default()
            }
        }
    }

    fn handle_quiz_click(&mut self, slide: usize, option: usize) -> EventOutcome {
        let messages = &self.config.quiz_messages;
        let verdict = self
            .document
            .slides_mut()
            .get_mut(slide)
            .and_then(|s| s.quiz.as_mut())
            .and_then(|quiz| quiz.answer(option, messages));

        match verdict {
            Some(verdict) => {
                info!("Quiz on slide {} answered: {}", slide + 1, verdict);
                self.scheduler
                    .schedule(self.config.quiz_reset, Task::ResetQuiz(slide));
            }
            None => {
                debug!("Quiz click on slide {} option {} ignored", slide + 1, option);
                self.stats.ignored_events += 1;
            }
        }
        EventOutcome::default()
    }

    /// Carry out an intent; returns whether a transition happened.
    fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Next if self.current + 1 < self.slide_count() => {
                self.navigate(self.current as isize + 1);
                true
            }
            Intent::Previous if self.current > 0 => {
                self.navigate(self.current as isize - 1);
                true
            }
            Intent::Goto(index) => {
                self.navigate(index as isize);
                true
            }
            _ => false,
        }
    }

    fn navigate(&mut self, index: isize) {
        let last = self.slide_count().saturating_sub(1);
        let index = index.clamp(0, last as isize) as usize;

        let fragment = fragment_for_slide(index);
        if self.location.set_hash(&fragment) {
            self.raised.push_back(InputEvent::HashChange(fragment));
        }

        info!("Showing slide {} of {}", index + 1, self.slide_count());
        self.stats.transitions += 1;
        self.set_active(index);
    }

    fn set_active(&mut self, index: usize) {
        self.current = index;

        for (position, slide) in self.document.slides_mut().iter_mut().enumerate() {
            slide.active = position == index;
        }
        for (position, dot) in self.document.dots_mut().iter_mut().enumerate() {
            dot.active = position == index;
        }
        self.document.progress_width = (index + 1) as f64 / self.slide_count() as f64 * 100.0;

        self.animate_slide_elements();
    }

    /// Restart the staggered entrance for the current slide's content.
    fn animate_slide_elements(&mut self) {
        for id in self.entrance_tasks.drain(..) {
            self.scheduler.cancel(id);
        }

        let stagger = self.config.stagger();
        let slide = self.current;
        let positions = match self.document.slide(slide) {
            Some(current) => current.animated_positions(),
            None => return,
        };
        for (order, index) in positions.into_iter().enumerate() {
            let element = ElementId { slide, index };
            if let Some(target) = self.document.element_mut(element) {
                target.style = ElementStyle::hidden();
            }
            // Commit the reset before the transition is scheduled
            self.document.flush_layout();
            let id = self
                .scheduler
                .schedule(stagger.delay(order), Task::EnterElement(element));
            self.entrance_tasks.push(id);
        }
        self.stats.entrance_runs += 1;
    }

    fn run(&mut self, id: TaskId, task: Task) {
        match task {
            Task::Unlock => {
                if self.scroll_lock == (ScrollLock::Locked { unlock: id }) {
                    debug!("Scroll lock released");
                    self.scroll_lock = ScrollLock::Idle;
                }
            }
            Task::EnterElement(element) => {
                self.entrance_tasks.retain(|pending| *pending != id);
                let style = ElementStyle::entered(self.config.entrance_duration);
                if let Some(target) = self.document.element_mut(element) {
                    target.style = style;
                }
            }
            Task::ResetQuiz(slide) => {
                if let Some(quiz) = self.document.slides_mut().get_mut(slide).and_then(|s| s.quiz.as_mut()) {
                    debug!("Resetting quiz on slide {}", slide + 1);
                    quiz.reset();
                }
            }
        }
    }

    fn process_raised(&mut self) {
        while let Some(event) = self.raised.pop_front() {
            self.handle(&event);
        }
    }
}
