// Metric domain models
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A named, staged measurement series tracked by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub stage: String,
    pub metric: String,
}

impl Metric {
    pub fn new(id: i64, stage: String, metric: String) -> Self {
        Self { id, stage, metric }
    }

    /// Chart label, e.g. "build latency".
    pub fn label(&self) -> String {
        format!("{} {}", self.stage, self.metric)
    }
}

/// One sample in a time series. On the wire this is a
/// `[timestamp_ms, value]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

impl From<(i64, f64)> for TimeSeriesPoint {
    fn from((timestamp_ms, value): (i64, f64)) -> Self {
        Self::new(timestamp_ms, value)
    }
}

impl From<TimeSeriesPoint> for (i64, f64) {
    fn from(point: TimeSeriesPoint) -> Self {
        (point.timestamp_ms, point.value)
    }
}

/// One reported data point for a declared metric. On the wire this is a
/// `[metric_id, timestamp_ms, value]` row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub metric_id: i64,
    pub timestamp_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(metric_id: i64, timestamp_ms: i64, value: f64) -> Self {
        Self {
            metric_id,
            timestamp_ms,
            value,
        }
    }
}

impl From<(i64, i64, f64)> for Sample {
    fn from((metric_id, timestamp_ms, value): (i64, i64, f64)) -> Self {
        Self::new(metric_id, timestamp_ms, value)
    }
}

impl From<Sample> for (i64, i64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.metric_id, sample.timestamp_ms, sample.value)
    }
}

/// An inclusive time range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The last `hours` hours, ending now.
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::hours(hours),
            end,
        }
    }

    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }
}
