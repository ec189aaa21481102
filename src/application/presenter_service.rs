// Chart presenter - the dataset-to-chart use case
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::application::chart_backend::ChartBackend;
use crate::application::dataset_source::DatasetSource;
use crate::application::hover_service::HoverService;
use crate::domain::chart::{ChartSpec, ChartStyle};
use crate::domain::color::{ColorEndpoints, ColorScale};
use crate::domain::observation::{clip_to_window, smooth};
use crate::domain::series::build_series;
use crate::domain::summary::Summary;
use crate::domain::timefmt::TimestampFormatter;

const MIN_WINDOW_DAYS: i64 = 2;
const MIN_SMOOTHING_MINUTES: i64 = 1;
const MAX_SMOOTHING_MINUTES: i64 = 360;

/// Per-request presentation knobs, mirroring the chart page's query
/// parameters. `None` leaves the dataset untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentOptions {
    pub window_days: Option<i64>,
    pub smoothing_minutes: Option<i64>,
}

/// The render-ready payload for one dataset load.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub chart: ChartSpec,
    pub summary: Option<Summary>,
}

/// The single presenter instance: owns its collaborators and surface names
/// explicitly rather than reaching for ambient globals.
pub struct ChartPresenter {
    source: Arc<dyn DatasetSource>,
    backend: Arc<dyn ChartBackend>,
    hover: Arc<HoverService>,
    formatter: TimestampFormatter,
    style: ChartStyle,
    endpoints: ColorEndpoints,
    chart_surface: String,
    hover_enabled: bool,
}

impl ChartPresenter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn DatasetSource>,
        backend: Arc<dyn ChartBackend>,
        hover: Arc<HoverService>,
        formatter: TimestampFormatter,
        style: ChartStyle,
        endpoints: ColorEndpoints,
        chart_surface: String,
        hover_enabled: bool,
    ) -> Self {
        Self {
            source,
            backend,
            hover,
            formatter,
            style,
            endpoints,
            chart_surface,
            hover_enabled,
        }
    }

    /// Wire the backend's hover subscription into the hover pipeline.
    pub fn start_hover_loop(&self) {
        let Some(events) = self.backend.subscribe_hover() else {
            return;
        };
        if !self.hover_enabled {
            // Drop the subscription so injected events fail fast instead of
            // piling up unread.
            drop(events);
            return;
        }
        tokio::spawn(Arc::clone(&self.hover).run(events));
    }

    /// Transform the current dataset into a rendered chart plus summary.
    /// Series derivation and chart composition are synchronous; only the
    /// dataset load and the render call suspend.
    pub async fn present(&self, options: &PresentOptions) -> anyhow::Result<Presentation> {
        let dataset = self.source.load().await?;

        let windowed = match options.window_days {
            Some(days) => clip_to_window(dataset, Utc::now(), days.max(MIN_WINDOW_DAYS)),
            None => dataset,
        };
        let smoothed = match options.smoothing_minutes {
            Some(minutes) => smooth(
                &windowed,
                minutes.clamp(MIN_SMOOTHING_MINUTES, MAX_SMOOTHING_MINUTES),
            ),
            None => windowed.clone(),
        };

        let series = build_series(&smoothed, &self.formatter);
        if series.is_empty() {
            tracing::debug!("dataset is empty; rendering an empty chart");
        }
        let scale = ColorScale::new(series.value_span(), self.endpoints);
        let chart = ChartSpec::compose(&series, &scale, &self.style);
        let summary = Summary::compute(&windowed, &smoothed, &self.formatter);

        if self.hover_enabled {
            self.hover.set_locations(series.locations.clone()).await;
        }

        self.backend.render(&self.chart_surface, &chart).await?;
        tracing::debug!(points = series.len(), "presented chart");

        Ok(Presentation { chart, summary })
    }
}
