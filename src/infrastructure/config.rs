// Configuration loading and defaults
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::domain::chart::ChartStyle;
use crate::domain::color::{ColorEndpoints, Rgb};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PresenterConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub hover: HoverSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    pub path: String,
    pub max_records: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: "data/observations.csv".to_string(),
            max_records: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub title: String,
    pub surface: String,
    pub timezone: String,
    pub x_title: String,
    pub y_title: String,
    pub tick_format: String,
    pub tick_angle: f64,
    pub tooltip_template: String,
    pub color_low: String,
    pub color_high: String,
    pub color_alpha: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let style = ChartStyle::default();
        Self {
            title: style.title,
            surface: "timeSeriesChart".to_string(),
            timezone: "America/New_York".to_string(),
            x_title: style.x_title,
            y_title: style.y_title,
            tick_format: style.tick_format,
            tick_angle: style.tick_angle,
            tooltip_template: style.tooltip_template,
            color_low: "#ff0000".to_string(),
            color_high: "#00ff00".to_string(),
            color_alpha: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HoverSettings {
    pub enabled: bool,
    pub surface: String,
    pub base_url: Option<String>,
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            surface: "imageContainer".to_string(),
            base_url: None,
        }
    }
}

impl ChartSettings {
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            title: self.title.clone(),
            x_title: self.x_title.clone(),
            y_title: self.y_title.clone(),
            tick_format: self.tick_format.clone(),
            tick_angle: self.tick_angle,
            tooltip_template: self.tooltip_template.clone(),
        }
    }

    pub fn color_endpoints(&self) -> Result<ColorEndpoints> {
        Ok(ColorEndpoints {
            low: parse_hex_color(&self.color_low)?,
            high: parse_hex_color(&self.color_high)?,
            alpha: self.color_alpha,
        })
    }
}

pub fn load_presenter_config() -> Result<PresenterConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/presenter").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(anyhow!("expected a #rrggbb color, got {hex:?}"));
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .with_context(|| format!("expected a #rrggbb color, got {hex:?}"))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_falls_back_to_defaults() {
        let settings = config::Config::builder().build().unwrap();
        let config: PresenterConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.data.max_records, 10_000);
        assert_eq!(config.chart.timezone, "America/New_York");
        assert_eq!(config.chart.surface, "timeSeriesChart");
        assert!(config.hover.enabled);
        assert_eq!(config.hover.base_url, None);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_hex_color("00ff7f").unwrap(), Rgb::new(0, 255, 127));
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("#f00").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn test_default_endpoints_parse() {
        let endpoints = ChartSettings::default().color_endpoints().unwrap();
        assert_eq!(endpoints.low, Rgb::new(255, 0, 0));
        assert_eq!(endpoints.high, Rgb::new(0, 255, 0));
        assert_eq!(endpoints.alpha, 0.5);
    }
}
