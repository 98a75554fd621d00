// Application state for HTTP handlers
use crate::application::metric_service::MetricService;

#[derive(Clone)]
pub struct AppState {
    pub metric_service: MetricService,
}
