// ABOUTME: Virtual-clock scheduler for deferred presentation work
// ABOUTME: Holds cancelable timed tasks and releases them in due-time order

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task, used to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A queue of tasks keyed by the virtual time they become due.
///
/// Tasks due at the same instant fire in the order they were scheduled.
/// Time only moves when the owner calls [`Scheduler::pop_due`] with a later
/// instant, so nothing here depends on a wall clock.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
    due_by_id: HashMap<u64, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now + delay;
        self.queue.insert((due, id), task);
        self.due_by_id.insert(id, due);
        TaskId(id)
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.due_by_id.remove(&id.0) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    /// Whether the task is still waiting to fire.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.due_by_id.contains_key(&id.0)
    }

    /// Number of tasks waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to its
    /// due time. When nothing is due the clock moves to `until` instead.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskId, T)> {
        let key = match self.queue.keys().next() {
            Some(&(due, id)) if due <= until => (due, id),
            _ => {
                if until > self.now {
                    self.now = until;
                }
                return None;
            }
        };

        let task = self.queue.remove(&key)?;
        self.due_by_id.remove(&key.1);
        if key.0 > self.now {
            self.now = key.0;
        }
        Some((TaskId(key.1), task))
    }
}
