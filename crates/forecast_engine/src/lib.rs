//! Forecast engine: weather transport and the async pipeline worker.
mod capability;
mod fetch;
mod pipeline;
mod wire;

pub use capability::{CurrentCapability, FetchCapability, WeeklyCapability};
pub use fetch::{FetchSettings, OpenWeatherFetcher, Units, WeatherFetcher, DEFAULT_BASE_URL};
pub use forecast_core::{FailureKind, FetchError};
pub use pipeline::{PipelineHandle, Subscription};
