// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use chrono_tz::Tz;
use tower_http::trace::TraceLayer;

use crate::application::hover_service::HoverService;
use crate::application::presenter_service::ChartPresenter;
use crate::application::surfaces::{ChartSurface, ImageSurface};
use crate::domain::timefmt::TimestampFormatter;
use crate::infrastructure::config::load_presenter_config;
use crate::infrastructure::csv_source::CsvFileSource;
use crate::infrastructure::embedded_backend::EmbeddedChartBackend;
use crate::infrastructure::http_image_fetcher::HttpImageFetcher;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_chart, get_image, health_check, trigger_hover};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load configuration
    let config = load_presenter_config()?;
    let zone: Tz = config.chart.timezone.parse().map_err(|err| {
        anyhow::anyhow!("bad display timezone {:?}: {err}", config.chart.timezone)
    })?;

    // Create adapters (infrastructure layer)
    let source = Arc::new(CsvFileSource::new(&config.data.path, config.data.max_records));
    let chart_surface = Arc::new(ChartSurface::new(config.chart.surface.clone()));
    let image_surface = Arc::new(ImageSurface::new(config.hover.surface.clone()));
    let backend = Arc::new(EmbeddedChartBackend::new(Arc::clone(&chart_surface)));
    let fetcher = Arc::new(HttpImageFetcher::new(config.hover.base_url.clone()));

    // Create services (application layer)
    let hover = Arc::new(HoverService::new(fetcher, Arc::clone(&image_surface)));
    let hover_events = backend.hover_sender();
    let presenter = ChartPresenter::new(
        source,
        backend,
        hover,
        TimestampFormatter::new(zone),
        config.chart.style(),
        config.chart.color_endpoints()?,
        config.chart.surface.clone(),
        config.hover.enabled,
    );
    presenter.start_hover_loop();

    // Create application state
    let state = Arc::new(AppState {
        presenter,
        hover_events,
        chart_surface,
        image_surface,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/hover/:index", post(trigger_hover))
        .route("/image", get(get_image))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .context("bad server bind address")?;
    println!("Starting crowdline service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
