mod command;
mod config;
mod logging;
mod render;

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use forecast_core::{PipelineState, Query, WeeklyForecast, WeeklyView};
use forecast_engine::{
    CurrentCapability, OpenWeatherFetcher, PipelineHandle, WeatherFetcher, WeeklyCapability,
};
use forecast_logging::{forecast_info, forecast_warn};
use log::LevelFilter;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::command::Command;
use crate::config::{AppConfig, API_KEY_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log_destination, level);
    forecast_info!("forecast starting against {}", config.base_url);

    if config.api_key.is_empty() {
        forecast_warn!("no API key configured");
        eprintln!("warning: no API key configured; set {API_KEY_ENV} or api_key in forecast.ron");
    }

    let fetcher: Arc<dyn WeatherFetcher> = Arc::new(
        OpenWeatherFetcher::new(config.fetch_settings()).context("building HTTP client")?,
    );
    let weekly = PipelineHandle::spawn(
        "weekly",
        config.weekly_pipeline(),
        Arc::new(WeeklyCapability::new(Arc::clone(&fetcher))),
    );
    let current = PipelineHandle::spawn(
        "current",
        config.current_pipeline(),
        Arc::new(CurrentCapability::new(fetcher)),
    );

    let active_query = Arc::new(Mutex::new(Query::default()));
    let _weekly_view = weekly.subscribe({
        let active_query = Arc::clone(&active_query);
        move |state: &PipelineState<WeeklyForecast>| {
            let query = active_query
                .lock()
                .map(|query| query.clone())
                .unwrap_or_default();
            print_block("weekly", &render::weekly_lines(&WeeklyView::from_state(&query, state)));
        }
    });
    let _current_view =
        current.subscribe(|state| print_block("now", &render::current_lines(state)));

    println!("Type a city to see its forecast, :now for current conditions, :quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::RefreshCurrent => {
                let query = active_query
                    .lock()
                    .map(|query| query.clone())
                    .unwrap_or_default();
                current.refresh_now(query.as_str());
            }
            Command::Query(text) => {
                if let Ok(mut query) = active_query.lock() {
                    *query = Query::new(&text);
                }
                weekly.set_query(text);
            }
        }
    }

    forecast_info!("shutting down");
    weekly.shutdown().await;
    current.shutdown().await;
    Ok(())
}

fn print_block(label: &str, lines: &[String]) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "[{label}]");
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}
