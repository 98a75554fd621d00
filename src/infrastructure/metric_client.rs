// Typed client for the metric service
use crate::application::metric_source::MetricSource;
use crate::domain::metric::{Metric, Sample, TimeRange, TimeSeriesPoint};
use crate::infrastructure::rpc_client::RpcClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const SERVICE: &str = "metric";

#[derive(Serialize)]
struct GetDataPayload {
    metric_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Serialize)]
struct DeclarePayload<'a> {
    stage: &'a str,
    metrics: &'a [String],
}

#[derive(Serialize)]
struct AddDataPayload {
    values: Vec<(i64, i64, f64)>,
}

/// Typed calls against the `metric` service. The dashboard reads through
/// it; crawler stages report through `declare` and `add_data`.
#[derive(Debug, Clone)]
pub struct MetricClient {
    rpc: RpcClient,
}

impl MetricClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Get-or-create metric ids for a stage. Returns name -> id.
    pub async fn declare(
        &self,
        stage: &str,
        metrics: &[String],
    ) -> anyhow::Result<HashMap<String, i64>> {
        let ids = self
            .rpc
            .send(SERVICE, "declare", &DeclarePayload { stage, metrics })
            .await?;
        Ok(ids)
    }

    /// Report a batch of samples.
    pub async fn add_data(&self, samples: &[Sample]) -> anyhow::Result<()> {
        let payload = AddDataPayload {
            values: samples.iter().map(|s| (*s).into()).collect(),
        };
        let _: Value = self.rpc.send(SERVICE, "add_data", &payload).await?;
        Ok(())
    }
}

#[async_trait]
impl MetricSource for MetricClient {
    async fn list_metrics(&self) -> anyhow::Result<Vec<Metric>> {
        let metrics = self
            .rpc
            .send(SERVICE, "list_metrics", &serde_json::json!({}))
            .await?;
        Ok(metrics)
    }

    async fn get_data(
        &self,
        metric_id: i64,
        range: &TimeRange,
    ) -> anyhow::Result<Vec<TimeSeriesPoint>> {
        let payload = GetDataPayload {
            metric_id,
            start: range.start,
            end: range.end,
        };
        let pairs: Vec<(i64, f64)> = self.rpc.send(SERVICE, "get_data", &payload).await?;

        Ok(pairs.into_iter().map(Into::into).collect())
    }
}
