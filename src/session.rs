// ABOUTME: Binds an input source to a shared presentation navigator
// ABOUTME: Subscribes a dispatching handler and detaches it again on request

use crate::input::{InputEvent, InputSource, SubscriptionId};
use crate::navigator::{EventOutcome, Navigator};
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// A navigator wired to an input source.
pub struct Session {
    navigator: Arc<Mutex<Navigator>>,
    subscription: Option<SubscriptionId>,
    last_outcome: Arc<Mutex<EventOutcome>>,
}

impl Session {
    /// Subscribe to `source`; every event it emits is dispatched to `navigator`.
    pub fn attach<S: InputSource + ?Sized>(source: &mut S, navigator: Navigator) -> Self {
        let navigator = Arc::new(Mutex::new(navigator));
        let last_outcome = Arc::new(Mutex::new(EventOutcome::default()));

        let shared = Arc::clone(&navigator);
        let outcome = Arc::clone(&last_outcome);
        let subscription = source.subscribe(Box::new(move |event: &InputEvent| {
            let result = shared.lock().dispatch(event);
            *outcome.lock() = result;
        }));
        debug!("Session attached as {:?}", subscription);

        Self {
            navigator,
            subscription: Some(subscription),
            last_outcome,
        }
    }

    /// Stop receiving events. Returns false if already detached.
    pub fn detach<S: InputSource + ?Sized>(&mut self, source: &mut S) -> bool {
        match self.subscription.take() {
            Some(id) => source.unsubscribe(id),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Shared handle to the navigator, for driving the clock or reading state.
    pub fn navigator(&self) -> Arc<Mutex<Navigator>> {
        Arc::clone(&self.navigator)
    }

    /// Outcome of the most recently dispatched event.
    pub fn last_outcome(&self) -> EventOutcome {
        *self.last_outcome.lock()
    }
}
