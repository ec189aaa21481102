// Headline statistics displayed beside the chart
use serde::Serialize;

use super::observation::Observation;
use super::timefmt::TimestampFormatter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub peak_time: String,
    pub max_count: f64,
    pub median_count: f64,
    pub latest_count: f64,
}

impl Summary {
    /// The median comes from the raw windowed data; peak and latest come
    /// from the smoothed view the chart shows. Absent when there is nothing
    /// to summarize.
    pub fn compute(
        windowed: &[Observation],
        smoothed: &[Observation],
        formatter: &TimestampFormatter,
    ) -> Option<Self> {
        let latest = smoothed.last()?;
        let peak = smoothed.iter().fold(&smoothed[0], |best, obs| {
            if obs.raw_count > best.raw_count { obs } else { best }
        });
        Some(Self {
            peak_time: formatter.format(peak.timestamp),
            max_count: peak.raw_count.round(),
            median_count: median(windowed).round(),
            latest_count: latest.raw_count.round(),
        })
    }
}

fn median(observations: &[Observation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }
    let mut counts: Vec<f64> = observations.iter().map(|obs| obs.raw_count).collect();
    counts.sort_by(|a, b| a.total_cmp(b));
    let mid = counts.len() / 2;
    if counts.len() % 2 == 1 {
        counts[mid]
    } else {
        (counts[mid - 1] + counts[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timefmt::parse_utc;

    fn obs(ts: &str, count: f64) -> Observation {
        Observation::new(parse_utc(ts).unwrap(), count, None)
    }

    #[test]
    fn test_summarizes_peak_median_and_latest() {
        let observations = vec![
            obs("2024-06-01T12:00:00Z", 4.0),
            obs("2024-06-01T13:00:00Z", 19.0),
            obs("2024-06-01T14:00:00Z", 7.0),
        ];
        let summary =
            Summary::compute(&observations, &observations, &TimestampFormatter::default()).unwrap();
        assert_eq!(summary.peak_time, "Jun 1, 2024, 9:00:00 AM");
        assert_eq!(summary.max_count, 19.0);
        assert_eq!(summary.median_count, 7.0);
        assert_eq!(summary.latest_count, 7.0);
    }

    #[test]
    fn test_first_peak_wins_on_ties() {
        let observations = vec![
            obs("2024-06-01T12:00:00Z", 9.0),
            obs("2024-06-01T13:00:00Z", 9.0),
        ];
        let summary =
            Summary::compute(&observations, &observations, &TimestampFormatter::default()).unwrap();
        assert_eq!(summary.peak_time, "Jun 1, 2024, 8:00:00 AM");
    }

    #[test]
    fn test_median_averages_the_middle_pair() {
        let windowed = vec![
            obs("2024-06-01T12:00:00Z", 2.0),
            obs("2024-06-01T13:00:00Z", 4.0),
            obs("2024-06-01T14:00:00Z", 9.0),
            obs("2024-06-01T15:00:00Z", 20.0),
        ];
        let summary =
            Summary::compute(&windowed, &windowed, &TimestampFormatter::default()).unwrap();
        assert_eq!(summary.median_count, 7.0);
    }

    #[test]
    fn test_empty_dataset_has_no_summary() {
        assert_eq!(
            Summary::compute(&[], &[], &TimestampFormatter::default()),
            None
        );
    }
}
