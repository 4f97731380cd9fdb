use crate::{CurrentConditions, ForecastEntry, PipelineState, Query, WeeklyForecast};

/// Placeholder shown whenever there is nothing to list.
pub const NO_RESULTS: &str = "No Results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRowView {
    pub day: String,
    pub month: String,
    pub temperature: String,
    pub title: String,
    pub description: String,
}

impl From<&ForecastEntry> for DayRowView {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            day: entry.timestamp.format("%d").to_string(),
            month: entry.timestamp.format("%B").to_string(),
            temperature: format_temperature(entry.temperature),
            title: entry.summary.clone(),
            description: entry.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeeklyView {
    /// City line plus "Weather today", present only when there are rows.
    pub headline: Option<(String, String)>,
    pub rows: Vec<DayRowView>,
    pub placeholder: Option<&'static str>,
    /// Failure text when the pipeline surfaces errors.
    pub error: Option<String>,
}

impl WeeklyView {
    pub fn from_state(query: &Query, state: &PipelineState<WeeklyForecast>) -> Self {
        let rows: Vec<DayRowView> = state
            .ready()
            .map(|entries| entries.iter().map(DayRowView::from).collect())
            .unwrap_or_default();
        let error = match state {
            PipelineState::Failed(err) => Some(err.to_string()),
            _ => None,
        };

        if rows.is_empty() {
            return Self {
                headline: None,
                rows,
                placeholder: Some(NO_RESULTS),
                error,
            };
        }

        Self {
            headline: Some((query.to_string(), "Weather today".to_string())),
            rows,
            placeholder: None,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location: String,
    pub temperature: String,
    pub max_temperature: String,
    pub min_temperature: String,
    pub humidity: String,
    pub coordinate: String,
}

impl From<&CurrentConditions> for CurrentView {
    fn from(current: &CurrentConditions) -> Self {
        Self {
            location: current.location.clone(),
            temperature: format_temperature(current.temperature),
            max_temperature: format_temperature(current.high),
            min_temperature: format_temperature(current.low),
            humidity: format!("{}%", current.humidity),
            coordinate: format!(
                "{:.4}, {:.4}",
                current.coordinate.latitude, current.coordinate.longitude
            ),
        }
    }
}

fn format_temperature(value: f64) -> String {
    format!("{value:.1}°")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Coordinate, FailureKind, FetchError};

    fn entry(day: u32, temperature: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap(),
            temperature,
            high: temperature + 2.0,
            low: temperature - 2.0,
            humidity: 70,
            summary: "Clouds".to_string(),
            description: "broken clouds".to_string(),
        }
    }

    #[test]
    fn row_formats_day_month_and_temperature() {
        let row = DayRowView::from(&entry(7, 12.345));
        assert_eq!(row.day, "07");
        assert_eq!(row.month, "October");
        assert_eq!(row.temperature, "12.3°");
        assert_eq!(row.title, "Clouds");
        assert_eq!(row.description, "broken clouds");
    }

    #[test]
    fn empty_state_shows_placeholder() {
        let view = WeeklyView::from_state(&Query::new("Paris"), &PipelineState::Empty);
        assert_eq!(view.placeholder, Some(NO_RESULTS));
        assert!(view.headline.is_none());
        assert!(view.rows.is_empty());
    }

    #[test]
    fn ready_state_lists_rows_with_headline() {
        let state = PipelineState::Ready(vec![entry(1, 10.0), entry(2, 11.0)]);
        let view = WeeklyView::from_state(&Query::new("Paris"), &state);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(
            view.headline,
            Some(("Paris".to_string(), "Weather today".to_string()))
        );
        assert_eq!(view.placeholder, None);
    }

    #[test]
    fn failed_state_renders_like_empty_but_keeps_error() {
        let state = PipelineState::Failed(FetchError::new(FailureKind::HttpStatus(404), "city not found"));
        let view = WeeklyView::from_state(&Query::new("Nowhere"), &state);
        assert_eq!(view.placeholder, Some(NO_RESULTS));
        assert_eq!(view.error.as_deref(), Some("http status 404: city not found"));
    }

    #[test]
    fn current_view_formats_fields() {
        let current = CurrentConditions {
            location: "Cupertino".to_string(),
            coordinate: Coordinate {
                latitude: 37.323,
                longitude: -122.0322,
            },
            observed_at: Utc.with_ymd_and_hms(2024, 10, 7, 12, 0, 0).unwrap(),
            temperature: 21.04,
            high: 24.0,
            low: 17.56,
            humidity: 40,
            summary: "Clear".to_string(),
        };
        let view = CurrentView::from(&current);
        assert_eq!(view.temperature, "21.0°");
        assert_eq!(view.max_temperature, "24.0°");
        assert_eq!(view.min_temperature, "17.6°");
        assert_eq!(view.humidity, "40%");
        assert_eq!(view.coordinate, "37.3230, -122.0322");
    }
}
