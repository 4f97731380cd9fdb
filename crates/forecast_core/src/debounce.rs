use std::time::{Duration, Instant};

use crate::Query;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    query: Query,
    deadline: Instant,
}

/// Coalesces raw query edits into settled queries.
///
/// Time is passed in by the caller, so the source itself never sleeps. The
/// value the source is constructed with is never settled: only values pushed
/// through [`QuerySource::emit`] can reach the pipeline.
#[derive(Debug, Clone)]
pub struct QuerySource {
    window: Option<Duration>,
    current: Query,
    pending: Option<Pending>,
}

impl QuerySource {
    pub fn new(initial: Query, window: Option<Duration>) -> Self {
        Self {
            window,
            current: initial,
            pending: None,
        }
    }

    /// Pushes a raw value.
    ///
    /// Without a quiet window the value settles at once and is returned.
    /// Otherwise it replaces any pending value and restarts the window.
    pub fn emit(&mut self, raw: &str, now: Instant) -> Option<Query> {
        let query = Query::new(raw);
        self.current = query.clone();
        match self.window {
            None => {
                self.pending = None;
                Some(query)
            }
            Some(window) => {
                self.pending = Some(Pending {
                    query,
                    deadline: now + window,
                });
                None
            }
        }
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Returns the pending value once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Query> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending.take().map(|pending| pending.query)
            }
            _ => None,
        }
    }

    /// Drops the pending value without settling it.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Most recent value pushed, or the initial value.
    pub fn current(&self) -> &Query {
        &self.current
    }

    pub fn window(&self) -> Option<Duration> {
        self.window
    }
}
