use chrono::{DateTime, NaiveDate, Utc};

/// One forecast slot as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub high: f64,
    pub low: f64,
    pub humidity: u8,
    /// Short condition group, e.g. "Rain".
    pub summary: String,
    /// Longer condition text, e.g. "light rain".
    pub description: String,
}

impl ForecastEntry {
    /// Identity key for deduplication: the UTC calendar day of the slot.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Ordered forecast slots; the weekly pipeline publishes one entry per day.
pub type WeeklyForecast = Vec<ForecastEntry>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Snapshot of the weather right now for a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location: String,
    pub coordinate: Coordinate,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub high: f64,
    pub low: f64,
    pub humidity: u8,
    pub summary: String,
}
