//! Forecast core: pure pipeline state machine, query debouncing and view-model helpers.
mod config;
mod debounce;
mod dedup;
mod effect;
mod error;
mod model;
mod msg;
mod publisher;
mod query;
mod state;
mod update;
mod view_model;

pub use config::{ErrorPolicy, PipelineConfig, DEFAULT_DEBOUNCE_WINDOW};
pub use debounce::QuerySource;
pub use dedup::{dedup_by_day, dedup_by_key};
pub use effect::Effect;
pub use error::{FailureKind, FetchError};
pub use model::{Coordinate, CurrentConditions, ForecastEntry, WeeklyForecast};
pub use msg::Msg;
pub use publisher::{BoxObserver, StatePublisher, SubscriptionId};
pub use query::Query;
pub use state::{Orchestrator, Phase, PipelineState, RequestId};
pub use update::update;
pub use view_model::{CurrentView, DayRowView, WeeklyView, NO_RESULTS};
