// Chart specification handed to the rendering backend
use serde::Serialize;

use super::color::ColorScale;
use super::series::DerivedSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxisSpec {
    pub title: String,
    pub tick_format: String,
    pub tick_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxisSpec {
    pub title: String,
    /// Display range padded beyond the value span; absent for the empty
    /// series, in which case the backend autoranges.
    pub range: Option<[f64; 2]>,
}

/// Presentation options that varied between the chart's script variants,
/// collapsed into one configurable value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub tick_format: String,
    pub tick_angle: f64,
    pub tooltip_template: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Count of People in Central Park".to_string(),
            x_title: "Time".to_string(),
            y_title: "Value".to_string(),
            tick_format: "%a, %Y-%m-%d %I:%M%p".to_string(),
            tick_angle: 10.0,
            tooltip_template: "Time: %{x}<br>Count: %{y}".to_string(),
        }
    }
}

const Y_PADDING_RATIO: f64 = 0.1;

/// Everything the rendering backend needs for one line chart: the derived
/// sequences, per-point colors, axis styling, and the per-point location
/// metadata the hover pipeline looks up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub point_colors: Vec<String>,
    pub locations: Vec<Option<String>>,
    pub x_axis: XAxisSpec,
    pub y_axis: YAxisSpec,
    pub tooltip_template: String,
}

impl ChartSpec {
    pub fn compose(series: &DerivedSeries, scale: &ColorScale, style: &ChartStyle) -> Self {
        let range = series.value_span().map(|span| {
            let padding = Y_PADDING_RATIO * span.spread();
            [span.min - padding, span.max + padding]
        });
        Self {
            kind: ChartKind::Line,
            title: style.title.clone(),
            labels: series.labels.clone(),
            values: series.values.clone(),
            point_colors: series
                .values
                .iter()
                .map(|value| scale.color_for(*value).to_string())
                .collect(),
            locations: series.locations.clone(),
            x_axis: XAxisSpec {
                title: style.x_title.clone(),
                tick_format: style.tick_format.clone(),
                tick_angle: style.tick_angle,
            },
            y_axis: YAxisSpec {
                title: style.y_title.clone(),
                range,
            },
            tooltip_template: style.tooltip_template.clone(),
        }
    }
}
