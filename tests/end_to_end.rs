// End-to-end: real server on an ephemeral port, real client, real controller
use std::sync::Arc;

use chrono::{Duration, Utc};
use unshadow_metrics::application::dashboard_service::DashboardService;
use unshadow_metrics::application::metric_service::MetricService;
use unshadow_metrics::application::metric_source::MetricSource;
use unshadow_metrics::domain::metric::Sample;
use unshadow_metrics::infrastructure::metric_client::MetricClient;
use unshadow_metrics::infrastructure::rpc_client::{RpcClient, TransportError};
use unshadow_metrics::infrastructure::sqlite_repository::SqliteRepository;
use unshadow_metrics::presentation::app_state::AppState;
use unshadow_metrics::presentation::handlers::router;

async fn start_server() -> String {
    let repository = Arc::new(SqliteRepository::in_memory().await.unwrap());
    let metric_service = MetricService::new(repository);
    let state = Arc::new(AppState { metric_service });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_report_then_dashboard() {
    let origin = start_server().await;
    let client = MetricClient::new(RpcClient::new(origin));

    let ids = client
        .declare("build", &["latency".to_string()])
        .await
        .unwrap();
    let id = ids["latency"];

    let now = Utc::now();
    let earlier = (now - Duration::hours(2)).timestamp_millis();
    let later = (now - Duration::hours(1)).timestamp_millis();

    client
        .add_data(&[Sample::new(id, later, 15.0), Sample::new(id, earlier, 12.0)])
        .await
        .unwrap();

    let dashboard = DashboardService::new(Arc::new(client))
        .build_dashboard(24)
        .await
        .unwrap();

    assert_eq!(dashboard.charts.len(), 1);
    let chart = &dashboard.charts[0];
    assert_eq!(chart.label, "build latency");

    // Ascending by timestamp, regardless of report order.
    assert_eq!(chart.points.len(), 2);
    assert_eq!(chart.points[0].timestamp_ms, earlier);
    assert_eq!(chart.points[0].value, 12.0);
    assert_eq!(chart.points[1].timestamp_ms, later);
    assert_eq!(chart.points[1].value, 15.0);
}

#[tokio::test]
async fn test_samples_outside_last_day_are_not_charted() {
    let origin = start_server().await;
    let client = MetricClient::new(RpcClient::new(origin));

    let ids = client
        .declare("fetch", &["pages".to_string()])
        .await
        .unwrap();
    let stale = (Utc::now() - Duration::days(3)).timestamp_millis();

    client
        .add_data(&[Sample::new(ids["pages"], stale, 7.0)])
        .await
        .unwrap();

    let dashboard = DashboardService::new(Arc::new(client))
        .build_dashboard(24)
        .await
        .unwrap();

    assert_eq!(dashboard.charts.len(), 1);
    assert!(dashboard.charts[0].is_empty());
}

#[tokio::test]
async fn test_unknown_method_is_not_found() {
    let origin = start_server().await;
    let rpc = RpcClient::new(origin);

    let error = rpc
        .send::<_, serde_json::Value>("metric", "drop_tables", &serde_json::json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TransportError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn test_empty_body_reads_as_empty_payload() {
    let origin = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/unshadow/metric/list_metrics", origin))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_empty_store_builds_empty_dashboard() {
    let origin = start_server().await;
    let client = MetricClient::new(RpcClient::new(origin));

    assert!(client.list_metrics().await.unwrap().is_empty());

    let dashboard = DashboardService::new(Arc::new(client))
        .build_dashboard(24)
        .await
        .unwrap();

    assert!(dashboard.charts.is_empty());
}
