// Observation domain model: record parsing, windowing, smoothing
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::timefmt::parse_utc;

/// One raw data point: a UTC instant, a crowd count, and the optional
/// location of an image captured alongside the count.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub raw_count: f64,
    pub location: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DataFormatError {
    #[error("record is missing the {0} field")]
    MissingField(&'static str),
    #[error("unparseable timestamp {0:?}")]
    BadTimestamp(String),
    #[error("non-numeric count {0:?}")]
    BadCount(String),
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, raw_count: f64, location: Option<String>) -> Self {
        Self {
            timestamp,
            raw_count,
            location,
        }
    }

    /// Parse a headerless `timestamp,raw_count[,location]` record.
    pub fn parse_record(record: &str) -> Result<Self, DataFormatError> {
        let mut fields = record.splitn(3, ',');
        let ts = fields
            .next()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(DataFormatError::MissingField("timestamp"))?;
        let count = fields
            .next()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(DataFormatError::MissingField("raw_count"))?;
        let location = fields
            .next()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string);

        let timestamp = parse_utc(ts)?;
        let raw_count = count
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or_else(|| DataFormatError::BadCount(count.to_string()))?;

        Ok(Self::new(timestamp, raw_count, location))
    }
}

/// Keep only observations newer than `now - days`, preserving order.
pub fn clip_to_window(
    observations: Vec<Observation>,
    now: DateTime<Utc>,
    days: i64,
) -> Vec<Observation> {
    let cutoff = now - Duration::days(days);
    observations
        .into_iter()
        .filter(|obs| obs.timestamp > cutoff)
        .collect()
}

/// Resample into fixed-width time buckets. Each bucket is labelled by its
/// start instant, counts are averaged and rounded to whole counts, and the
/// last non-empty location in the bucket is carried. Buckets are emitted in
/// encounter order.
pub fn smooth(observations: &[Observation], minutes: i64) -> Vec<Observation> {
    let step = minutes.max(1) * 60;
    let mut smoothed = Vec::new();
    let mut bucket: Option<Bucket> = None;

    for obs in observations {
        let key = obs.timestamp.timestamp().div_euclid(step);
        match bucket.as_mut() {
            Some(current) if current.key == key => current.add(obs),
            _ => {
                if let Some(done) = bucket.take() {
                    smoothed.push(done.finish(step));
                }
                bucket = Some(Bucket::start(key, obs));
            }
        }
    }
    if let Some(done) = bucket.take() {
        smoothed.push(done.finish(step));
    }
    smoothed
}

struct Bucket {
    key: i64,
    first_seen: DateTime<Utc>,
    sum: f64,
    count: usize,
    location: Option<String>,
}

impl Bucket {
    fn start(key: i64, obs: &Observation) -> Self {
        Self {
            key,
            first_seen: obs.timestamp,
            sum: obs.raw_count,
            count: 1,
            location: obs.location.clone(),
        }
    }

    fn add(&mut self, obs: &Observation) {
        self.sum += obs.raw_count;
        self.count += 1;
        if obs.location.is_some() {
            self.location = obs.location.clone();
        }
    }

    fn finish(self, step: i64) -> Observation {
        let start = DateTime::from_timestamp(self.key * step, 0).unwrap_or(self.first_seen);
        Observation::new(start, (self.sum / self.count as f64).round(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> DateTime<Utc> {
        parse_utc(ts).unwrap()
    }

    #[test]
    fn test_parses_full_record() {
        let obs = Observation::parse_record("2024-01-01T00:00:00,5,/raw/a.jpg").unwrap();
        assert_eq!(obs.timestamp, at("2024-01-01T00:00:00Z"));
        assert_eq!(obs.raw_count, 5.0);
        assert_eq!(obs.location.as_deref(), Some("/raw/a.jpg"));
    }

    #[test]
    fn test_location_field_is_optional() {
        let two_fields = Observation::parse_record("2024-01-01T00:00:00,5").unwrap();
        assert_eq!(two_fields.location, None);

        let empty_third = Observation::parse_record("2024-01-01T00:00:00,5,").unwrap();
        assert_eq!(empty_third.location, None);
    }

    #[test]
    fn test_rejects_malformed_records() {
        assert_eq!(
            Observation::parse_record("2024-01-01T00:00:00"),
            Err(DataFormatError::MissingField("raw_count"))
        );
        assert_eq!(
            Observation::parse_record("yesterday,5"),
            Err(DataFormatError::BadTimestamp("yesterday".to_string()))
        );
        assert_eq!(
            Observation::parse_record("2024-01-01T00:00:00,lots"),
            Err(DataFormatError::BadCount("lots".to_string()))
        );
        assert_eq!(
            Observation::parse_record("2024-01-01T00:00:00,NaN"),
            Err(DataFormatError::BadCount("NaN".to_string()))
        );
    }

    #[test]
    fn test_window_keeps_recent_observations_in_order() {
        let observations = vec![
            Observation::new(at("2024-05-28T00:00:00Z"), 1.0, None),
            Observation::new(at("2024-05-31T00:00:00Z"), 2.0, None),
            Observation::new(at("2024-06-01T00:00:00Z"), 3.0, None),
        ];
        let clipped = clip_to_window(observations, at("2024-06-01T12:00:00Z"), 2);
        let counts: Vec<f64> = clipped.iter().map(|obs| obs.raw_count).collect();
        assert_eq!(counts, vec![2.0, 3.0]);
    }

    #[test]
    fn test_smooth_averages_buckets_and_keeps_last_location() {
        let observations = vec![
            Observation::new(at("2024-06-01T00:01:00Z"), 4.0, Some("/raw/a.jpg".into())),
            Observation::new(at("2024-06-01T00:07:00Z"), 7.0, Some("/raw/b.jpg".into())),
            Observation::new(at("2024-06-01T00:12:00Z"), 9.0, None),
        ];
        let smoothed = smooth(&observations, 10);
        assert_eq!(smoothed.len(), 2);

        // First bucket: mean of 4 and 7 rounds to 6, labelled by the bucket
        // start, carrying the last location seen.
        assert_eq!(smoothed[0].timestamp, at("2024-06-01T00:00:00Z"));
        assert_eq!(smoothed[0].raw_count, 6.0);
        assert_eq!(smoothed[0].location.as_deref(), Some("/raw/b.jpg"));

        assert_eq!(smoothed[1].timestamp, at("2024-06-01T00:10:00Z"));
        assert_eq!(smoothed[1].raw_count, 9.0);
        assert_eq!(smoothed[1].location, None);
    }

    #[test]
    fn test_smooth_of_empty_dataset_is_empty() {
        assert!(smooth(&[], 60).is_empty());
    }
}
