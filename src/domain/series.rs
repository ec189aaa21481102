// Derived display series built once per dataset load
use super::observation::Observation;
use super::timefmt::TimestampFormatter;

/// Index-aligned display sequences: entry `i` in every vector describes the
/// same observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub locations: Vec<Option<String>>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Min and max of the values, absent for the empty series.
    pub fn value_span(&self) -> Option<ValueSpan> {
        let mut values = self.values.iter().copied();
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(ValueSpan { min, max })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSpan {
    pub min: f64,
    pub max: f64,
}

impl ValueSpan {
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Derive the display series for a dataset. Pure; an empty dataset yields
/// empty, still index-aligned sequences.
pub fn build_series(
    observations: &[Observation],
    formatter: &TimestampFormatter,
) -> DerivedSeries {
    let mut series = DerivedSeries {
        labels: Vec::with_capacity(observations.len()),
        values: Vec::with_capacity(observations.len()),
        locations: Vec::with_capacity(observations.len()),
    };
    for obs in observations {
        series.labels.push(formatter.format(obs.timestamp));
        series.values.push(obs.raw_count);
        series.locations.push(obs.location.clone());
    }
    series
}
