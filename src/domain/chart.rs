// Dashboard render model
use super::metric::TimeSeriesPoint;

/// One rendered time-series plot. A chart with no points is valid; it is
/// what a metric whose data fetch failed renders as.
#[derive(Debug, Clone)]
pub struct Chart {
    pub label: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl Chart {
    pub fn new(label: String, points: Vec<TimeSeriesPoint>) -> Self {
        Self { label, points }
    }

    pub fn empty(label: String) -> Self {
        Self {
            label,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub charts: Vec<Chart>,
}

impl Dashboard {
    pub fn new(title: String, charts: Vec<Chart>) -> Self {
        Self { title, charts }
    }
}
