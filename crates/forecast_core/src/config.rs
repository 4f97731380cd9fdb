use std::fmt;
use std::time::Duration;

use crate::{dedup_by_day, CurrentConditions, WeeklyForecast};

/// Quiet window used by the weekly pipeline.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// What a failed fetch publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Publish `Empty`, indistinguishable from "no data yet".
    #[default]
    CollapseToEmpty,
    /// Publish `Failed` carrying the fetch error.
    Surface,
}

/// Per-pipeline options. The weekly and current pipelines differ only here.
pub struct PipelineConfig<T> {
    pub debounce_window: Option<Duration>,
    pub dedup: Option<fn(T) -> T>,
    pub error_policy: ErrorPolicy,
}

impl<T> PipelineConfig<T> {
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn with_debounce_window(mut self, window: Option<Duration>) -> Self {
        self.debounce_window = window;
        self
    }
}

impl PipelineConfig<WeeklyForecast> {
    pub fn weekly() -> Self {
        Self {
            debounce_window: Some(DEFAULT_DEBOUNCE_WINDOW),
            dedup: Some(dedup_by_day),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl PipelineConfig<CurrentConditions> {
    pub fn current() -> Self {
        Self::default()
    }
}

impl<T> Default for PipelineConfig<T> {
    fn default() -> Self {
        Self {
            debounce_window: None,
            dedup: None,
            error_policy: ErrorPolicy::default(),
        }
    }
}

// Manual impls so `T` needs neither `Clone` nor `Debug`.
impl<T> Clone for PipelineConfig<T> {
    fn clone(&self) -> Self {
        Self {
            debounce_window: self.debounce_window,
            dedup: self.dedup,
            error_policy: self.error_policy,
        }
    }
}

impl<T> fmt::Debug for PipelineConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("debounce_window", &self.debounce_window)
            .field("dedup", &self.dedup.is_some())
            .field("error_policy", &self.error_policy)
            .finish()
    }
}
