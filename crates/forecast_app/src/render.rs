//! Plain-text rendering of the view models.

use forecast_core::{CurrentConditions, CurrentView, PipelineState, WeeklyView, NO_RESULTS};

pub fn weekly_lines(view: &WeeklyView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.rows.len() + 2);
    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }
    if let Some((city, subtitle)) = &view.headline {
        lines.push(format!("{city} | {subtitle}"));
    }
    for row in &view.rows {
        lines.push(format!(
            "  {:>2} {:<9} {:>7}  {}: {}",
            row.day, row.month, row.temperature, row.title, row.description
        ));
    }
    if let Some(placeholder) = view.placeholder {
        lines.push(placeholder.to_string());
    }
    lines
}

pub fn current_lines(state: &PipelineState<CurrentConditions>) -> Vec<String> {
    match state {
        PipelineState::Empty => vec![NO_RESULTS.to_string()],
        PipelineState::Failed(error) => vec![format!("! {error}"), NO_RESULTS.to_string()],
        PipelineState::Ready(current) => {
            let view = CurrentView::from(current);
            vec![
                format!("{} ({})", view.location, view.coordinate),
                format!(
                    "  now {}  max {}  min {}",
                    view.temperature, view.max_temperature, view.min_temperature
                ),
                format!("  humidity {}", view.humidity),
            ]
        }
    }
}
