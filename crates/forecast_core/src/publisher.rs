use std::sync::atomic::{AtomicU64, Ordering};

use crate::PipelineState;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle for one observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

pub type BoxObserver<T> = Box<dyn FnMut(&PipelineState<T>) + Send>;

/// Latest-value holder with replay-one delivery.
pub struct StatePublisher<T> {
    current: PipelineState<T>,
    observers: Vec<(SubscriptionId, BoxObserver<T>)>,
}

impl<T> Default for StatePublisher<T> {
    fn default() -> Self {
        Self {
            current: PipelineState::Empty,
            observers: Vec::new(),
        }
    }
}

impl<T> StatePublisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PipelineState<T>) + Send + 'static,
    {
        let id = SubscriptionId::next();
        self.attach(id, Box::new(observer));
        id
    }

    /// Registers `observer` under a caller-chosen id and replays the current state to it.
    pub fn attach(&mut self, id: SubscriptionId, mut observer: BoxObserver<T>) {
        observer(&self.current);
        self.observers.push((id, observer));
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, state: PipelineState<T>) {
        self.current = state;
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.current);
        }
    }

    pub fn current(&self) -> &PipelineState<T> {
        &self.current
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Releases every registration.
    pub fn clear(&mut self) {
        self.observers.clear();
    }
}
