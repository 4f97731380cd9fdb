use crate::{ErrorPolicy, FetchError, PipelineConfig, Query};

pub type RequestId = u64;

/// What observers see.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState<T> {
    /// Idle, cleared, or (under the default policy) failed.
    Empty,
    Ready(T),
    /// Only published under [`ErrorPolicy::Surface`].
    Failed(FetchError),
}

impl<T> Default for PipelineState<T> {
    fn default() -> Self {
        PipelineState::Empty
    }
}

impl<T> PipelineState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            PipelineState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PipelineState::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching {
        request_id: RequestId,
        query: Query,
    },
    /// Torn down; no further transitions.
    Closed,
}

/// Orchestrator state. Only [`crate::update`] mutates it.
#[derive(Debug, Clone)]
pub struct Orchestrator<T> {
    config: PipelineConfig<T>,
    phase: Phase,
    published: PipelineState<T>,
    last_error: Option<FetchError>,
    next_request_id: RequestId,
}

impl<T> Default for Orchestrator<T> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<T> Orchestrator<T> {
    pub fn new(config: PipelineConfig<T>) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            published: PipelineState::Empty,
            last_error: None,
            next_request_id: 1,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Last state handed to the publisher.
    pub fn published(&self) -> &PipelineState<T> {
        &self.published
    }

    /// Diagnostic detail of the most recent failure, kept even when the
    /// failure was collapsed to `Empty`.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &PipelineConfig<T> {
        &self.config
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        match &self.phase {
            Phase::Fetching { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub(crate) fn set_published(&mut self, state: PipelineState<T>) {
        self.published = state;
    }

    pub(crate) fn record_error(&mut self, error: FetchError) {
        self.last_error = Some(error);
    }

    pub(crate) fn failure_state(&self, error: FetchError) -> PipelineState<T> {
        match self.config.error_policy {
            ErrorPolicy::CollapseToEmpty => PipelineState::Empty,
            ErrorPolicy::Surface => PipelineState::Failed(error),
        }
    }

    pub(crate) fn apply_dedup(&self, result: T) -> T {
        match self.config.dedup {
            Some(dedup) => dedup(result),
            None => result,
        }
    }
}
