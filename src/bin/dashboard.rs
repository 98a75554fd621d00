// Dashboard entry point - Fetch the metric list and print one chart per metric
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use unshadow_metrics::application::dashboard_service::DashboardService;
use unshadow_metrics::domain::chart::Chart;
use unshadow_metrics::infrastructure::config::load_dashboard_config;
use unshadow_metrics::infrastructure::metric_client::MetricClient;
use unshadow_metrics::infrastructure::rpc_client::RpcClient;

fn render_chart(chart: &Chart) {
    if chart.is_empty() {
        println!("{} (no data)", chart.label);
        return;
    }

    println!("{} ({} points)", chart.label, chart.points.len());
    for point in &chart.points {
        let timestamp = match Utc.timestamp_millis_opt(point.timestamp_ms).single() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}ms", point.timestamp_ms),
        };
        println!("  {}  {}", timestamp, point.value);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let dashboard_config = load_dashboard_config()?;

    // Create the transport client and wire it into the controller
    let rpc = RpcClient::new(dashboard_config.server.origin);
    let client = Arc::new(MetricClient::new(rpc));
    let dashboard_service = DashboardService::new(client);

    let dashboard = dashboard_service
        .build_dashboard(dashboard_config.range_hours)
        .await?;

    println!("{}", dashboard.title);
    println!();

    for chart in &dashboard.charts {
        render_chart(chart);
    }

    Ok(())
}
