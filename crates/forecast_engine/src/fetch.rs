use std::time::Duration;

use forecast_core::{CurrentConditions, FailureKind, FetchError, WeeklyForecast};
use forecast_logging::{forecast_debug, TRANSPORT_TARGET};
use futures_util::StreamExt;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::wire::{CurrentResponse, ForecastResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Measurement system requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_param(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub api_key: String,
    pub units: Units,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            units: Units::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Both weather lookups the pipelines consume.
#[async_trait::async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn weekly_forecast(&self, query: &str) -> Result<WeeklyForecast, FetchError>;

    async fn current_weather(&self, query: &str) -> Result<CurrentConditions, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl OpenWeatherFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str, query: &str) -> Result<Url, FetchError> {
        let base = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse_with_params(
            &base,
            &[
                ("q", query),
                ("mode", "json"),
                ("units", self.settings.units.as_param()),
                ("APPID", self.settings.api_key.as_str()),
            ],
        )
        .map_err(|err| FetchError::new(FailureKind::InvalidRequest, format!("couldn't create URL: {err}")))
    }

    async fn get_json<W: DeserializeOwned>(&self, url: Url) -> Result<W, FetchError> {
        forecast_debug!(target: TRANSPORT_TARGET, "GET {}", url.path());
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Parsing, err.to_string()))
    }
}

#[async_trait::async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn weekly_forecast(&self, query: &str) -> Result<WeeklyForecast, FetchError> {
        let url = self.endpoint("forecast", query)?;
        let response: ForecastResponse = self.get_json(url).await?;
        response.into_entries()
    }

    async fn current_weather(&self, query: &str) -> Result<CurrentConditions, FetchError> {
        let url = self.endpoint("weather", query)?;
        let response: CurrentResponse = self.get_json(url).await?;
        response.into_conditions()
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
