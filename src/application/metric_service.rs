// Metric service - RPC dispatch over the metric store
use crate::application::metric_repository::MetricRepository;
use crate::domain::metric::{Sample, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    /// No such service/method pair is exposed.
    #[error("method does not exist: {service}/{method}")]
    MethodNotFound { service: String, method: String },
    /// The payload did not decode as the method's request shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Deserialize)]
struct GetDataRequest {
    metric_id: i64,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct DeclareRequest {
    stage: String,
    metrics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddDataRequest {
    values: Vec<(i64, i64, f64)>,
}

#[derive(Debug, Deserialize)]
struct GetStageMetricRequest {
    stage: String,
}

#[derive(Clone)]
pub struct MetricService {
    repository: Arc<dyn MetricRepository>,
}

impl MetricService {
    pub fn new(repository: Arc<dyn MetricRepository>) -> Self {
        Self { repository }
    }

    /// Route one `<service>/<method>` call to the store and encode the
    /// response the way the wire expects it.
    pub async fn dispatch(
        &self,
        service: &str,
        method: &str,
        payload: Value,
    ) -> Result<Value, RpcError> {
        if service != "metric" {
            return Err(RpcError::MethodNotFound {
                service: service.to_string(),
                method: method.to_string(),
            });
        }

        match method {
            "list_metrics" => {
                let metrics = self.repository.list_metrics().await?;
                encode(&metrics)
            }
            "get_data" => {
                let request: GetDataRequest = decode(payload)?;
                let range = TimeRange::new(request.start, request.end);
                let points = self.repository.get_data(request.metric_id, &range).await?;

                let pairs: Vec<(i64, f64)> = points.into_iter().map(Into::into).collect();
                encode(&pairs)
            }
            "declare" => {
                let request: DeclareRequest = decode(payload)?;
                let ids = self
                    .repository
                    .declare(&request.stage, &request.metrics)
                    .await?;
                encode(&ids)
            }
            "add_data" => {
                let request: AddDataRequest = decode(payload)?;
                let samples: Vec<Sample> = request.values.into_iter().map(Into::into).collect();
                self.repository.add_data(&samples).await?;
                Ok(Value::Null)
            }
            "get_stage_metric" => {
                let request: GetStageMetricRequest = decode(payload)?;
                let metrics = self.repository.stage_metrics(&request.stage).await?;
                encode(&metrics)
            }
            _ => Err(RpcError::MethodNotFound {
                service: service.to_string(),
                method: method.to_string(),
            }),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, RpcError> {
    serde_json::from_value(payload).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Internal(e.into()))
}
