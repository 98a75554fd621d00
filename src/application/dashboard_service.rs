// Dashboard service - Fetch every metric's recent window and chart it
use crate::application::metric_source::MetricSource;
use crate::domain::chart::{Chart, Dashboard};
use crate::domain::metric::TimeRange;
use futures::future;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn MetricSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self { source }
    }

    /// List the metrics, then fetch every series for the last `hours`
    /// hours concurrently. One chart per metric, in list order; a metric
    /// whose fetch fails charts empty rather than failing the dashboard.
    pub async fn build_dashboard(&self, hours: i64) -> anyhow::Result<Dashboard> {
        let range = TimeRange::last_hours(hours);
        let metrics = self.source.list_metrics().await?;

        tracing::debug!("Building dashboard for {} metrics", metrics.len());

        let fetches = metrics.iter().map(|metric| {
            let source = self.source.clone();
            let label = metric.label();
            let metric_id = metric.id;

            async move {
                match source.get_data(metric_id, &range).await {
                    Ok(points) => Chart::new(label, points),
                    Err(e) => {
                        tracing::error!("Error fetching data for {}: {}", label, e);
                        Chart::empty(label)
                    }
                }
            }
        });

        let charts = future::join_all(fetches).await;
        let title = format!("Unshadow Metrics (last {}h)", hours);

        Ok(Dashboard::new(title, charts))
    }
}
