//! OpenWeatherMap response shapes and their mapping onto the forecast model.

use chrono::{DateTime, Utc};
use forecast_core::{Coordinate, CurrentConditions, FailureKind, FetchError, ForecastEntry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub name: String,
    pub coord: Coord,
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainReadings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl ForecastResponse {
    pub fn into_entries(self) -> Result<Vec<ForecastEntry>, FetchError> {
        self.list.into_iter().map(ForecastItem::into_entry).collect()
    }
}

impl ForecastItem {
    fn into_entry(self) -> Result<ForecastEntry, FetchError> {
        let (summary, description) = first_condition(self.weather);
        Ok(ForecastEntry {
            timestamp: timestamp(self.dt)?,
            temperature: self.main.temp,
            high: self.main.temp_max,
            low: self.main.temp_min,
            humidity: self.main.humidity,
            summary,
            description,
        })
    }
}

impl CurrentResponse {
    pub fn into_conditions(self) -> Result<CurrentConditions, FetchError> {
        let (summary, _) = first_condition(self.weather);
        Ok(CurrentConditions {
            location: self.name,
            coordinate: Coordinate {
                latitude: self.coord.lat,
                longitude: self.coord.lon,
            },
            observed_at: timestamp(self.dt)?,
            temperature: self.main.temp,
            high: self.main.temp_max,
            low: self.main.temp_min,
            humidity: self.main.humidity,
            summary,
        })
    }
}

fn first_condition(conditions: Vec<Condition>) -> (String, String) {
    conditions
        .into_iter()
        .next()
        .map(|condition| (condition.main, condition.description))
        .unwrap_or_default()
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        FetchError::new(
            FailureKind::Parsing,
            format!("timestamp {seconds} out of range"),
        )
    })
}
