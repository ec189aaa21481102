// Value-to-color scale for chart points
use std::fmt;

use super::series::ValueSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// CSS-style color with 8-bit channels and fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Endpoint hues for the scale: `low` at the span minimum, `high` at the
/// maximum, both rendered at the same alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEndpoints {
    pub low: Rgb,
    pub high: Rgb,
    pub alpha: f32,
}

impl Default for ColorEndpoints {
    fn default() -> Self {
        Self {
            low: Rgb::new(255, 0, 0),
            high: Rgb::new(0, 255, 0),
            alpha: 0.5,
        }
    }
}

/// Pure value-to-color function over a dataset's value span.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    span: Option<ValueSpan>,
    endpoints: ColorEndpoints,
}

impl ColorScale {
    pub fn new(span: Option<ValueSpan>, endpoints: ColorEndpoints) -> Self {
        Self { span, endpoints }
    }

    pub fn color_for(&self, value: f64) -> Rgba {
        // A flat or empty span has no usable normalization; pin the blend at
        // the midpoint instead of dividing by zero.
        let t = match self.span {
            Some(span) if span.spread() > 0.0 => {
                ((value - span.min) / span.spread()).clamp(0.0, 1.0)
            }
            _ => 0.5,
        };
        Rgba {
            r: blend(self.endpoints.low.r, self.endpoints.high.r, t),
            g: blend(self.endpoints.low.g, self.endpoints.high.g, t),
            b: blend(self.endpoints.low.b, self.endpoints.high.b, t),
            a: self.endpoints.alpha,
        }
    }
}

fn blend(low: u8, high: u8, t: f64) -> u8 {
    (low as f64 + (high as f64 - low as f64) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}
