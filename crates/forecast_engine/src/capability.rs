use std::sync::Arc;

use forecast_core::{CurrentConditions, FetchError, WeeklyForecast};

use crate::WeatherFetcher;

/// One cancellable lookup: query in, typed result out.
///
/// Implementations hold no per-call state; the pipeline worker races each call
/// against its cancellation token, so a call may be dropped at any await point.
#[async_trait::async_trait]
pub trait FetchCapability<T>: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<T, FetchError>;
}

/// Exposes [`WeatherFetcher::weekly_forecast`] as a pipeline capability.
#[derive(Clone)]
pub struct WeeklyCapability {
    fetcher: Arc<dyn WeatherFetcher>,
}

impl WeeklyCapability {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl FetchCapability<WeeklyForecast> for WeeklyCapability {
    async fn fetch(&self, query: &str) -> Result<WeeklyForecast, FetchError> {
        self.fetcher.weekly_forecast(query).await
    }
}

/// Exposes [`WeatherFetcher::current_weather`] as a pipeline capability.
#[derive(Clone)]
pub struct CurrentCapability {
    fetcher: Arc<dyn WeatherFetcher>,
}

impl CurrentCapability {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl FetchCapability<CurrentConditions> for CurrentCapability {
    async fn fetch(&self, query: &str) -> Result<CurrentConditions, FetchError> {
        self.fetcher.current_weather(query).await
    }
}
