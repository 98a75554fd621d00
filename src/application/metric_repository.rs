// Repository trait for the metric store
use crate::domain::metric::{Metric, Sample, TimeRange, TimeSeriesPoint};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Get-or-create metrics for a stage. Returns name -> id for every
    /// metric of the stage, whether it already existed or was just created.
    async fn declare(&self, stage: &str, names: &[String]) -> anyhow::Result<HashMap<String, i64>>;

    /// Append reported samples.
    async fn add_data(&self, samples: &[Sample]) -> anyhow::Result<()>;

    /// The series for one metric inside a range (inclusive bounds),
    /// ascending by timestamp.
    async fn get_data(
        &self,
        metric_id: i64,
        range: &TimeRange,
    ) -> anyhow::Result<Vec<TimeSeriesPoint>>;

    /// List all declared metrics.
    async fn list_metrics(&self) -> anyhow::Result<Vec<Metric>>;

    /// The (id, name) pairs declared for one stage.
    async fn stage_metrics(&self, stage: &str) -> anyhow::Result<Vec<(i64, String)>>;
}
