// Client-side seam the dashboard controller reads metrics through
use crate::domain::metric::{Metric, TimeRange, TimeSeriesPoint};
use async_trait::async_trait;

/// What the dashboard needs from the backend: the metric list and one
/// series per metric. Implemented over RPC by `MetricClient`.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn list_metrics(&self) -> anyhow::Result<Vec<Metric>>;

    async fn get_data(
        &self,
        metric_id: i64,
        range: &TimeRange,
    ) -> anyhow::Result<Vec<TimeSeriesPoint>>;
}
