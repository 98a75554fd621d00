// SQLite repository implementation
use crate::application::metric_repository::MetricRepository;
use crate::domain::metric::{Metric, Sample, TimeRange, TimeSeriesPoint};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS metric (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        stage TEXT NOT NULL,
        metric TEXT NOT NULL,
        UNIQUE (stage, metric)
    );

    CREATE TABLE IF NOT EXISTS metric_data (
        metric_id INTEGER NOT NULL,
        timestamp_ms INTEGER NOT NULL,
        value REAL NOT NULL,
        FOREIGN KEY (metric_id) REFERENCES metric (id)
    );

    CREATE INDEX IF NOT EXISTS metric_id_idx ON metric_data (metric_id);
    CREATE INDEX IF NOT EXISTS timestamp_idx ON metric_data (timestamp_ms ASC);
";

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (or create) the database at `url` and declare the schema if it
    /// does not exist yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .connect(url)
            .await
            .with_context(|| format!("Failed to open metric database at {}", url))?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database, used by tests and the integration
    /// harness. Single connection: each sqlite `:memory:` connection is its
    /// own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to declare metric schema")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MetricRepository for SqliteRepository {
    async fn declare(&self, stage: &str, names: &[String]) -> Result<HashMap<String, i64>> {
        let mut tx = self.pool.begin().await?;

        for name in names {
            sqlx::query("INSERT OR IGNORE INTO metric (stage, metric) VALUES (?1, ?2)")
                .bind(stage)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let rows = sqlx::query("SELECT id, metric FROM metric WHERE stage = ?1")
            .bind(stage)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<String, _>("metric"), row.get::<i64, _>("id")))
            .collect())
    }

    async fn add_data(&self, samples: &[Sample]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for sample in samples {
            sqlx::query(
                "INSERT INTO metric_data (metric_id, timestamp_ms, value) VALUES (?1, ?2, ?3)",
            )
            .bind(sample.metric_id)
            .bind(sample.timestamp_ms)
            .bind(sample.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_data(&self, metric_id: i64, range: &TimeRange) -> Result<Vec<TimeSeriesPoint>> {
        let rows = sqlx::query(
            "SELECT timestamp_ms, value FROM metric_data
             WHERE
                 metric_id = ?1 AND
                 timestamp_ms >= ?2 AND
                 timestamp_ms <= ?3
             ORDER BY timestamp_ms ASC",
        )
        .bind(metric_id)
        .bind(range.start_ms())
        .bind(range.end_ms())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                TimeSeriesPoint::new(row.get::<i64, _>("timestamp_ms"), row.get::<f64, _>("value"))
            })
            .collect())
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>> {
        let rows = sqlx::query("SELECT id, stage, metric FROM metric ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                Metric::new(
                    row.get::<i64, _>("id"),
                    row.get::<String, _>("stage"),
                    row.get::<String, _>("metric"),
                )
            })
            .collect())
    }

    async fn stage_metrics(&self, stage: &str) -> Result<Vec<(i64, String)>> {
        let rows = sqlx::query("SELECT id, metric FROM metric WHERE stage = ?1 ORDER BY id ASC")
            .bind(stage)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<i64, _>("id"), row.get::<String, _>("metric")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_ms: i64, end_ms: i64) -> TimeRange {
        TimeRange::new(
            Utc.timestamp_millis_opt(start_ms).unwrap(),
            Utc.timestamp_millis_opt(end_ms).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_declare_is_idempotent() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let names = vec!["pages".to_string(), "errors".to_string()];

        let first = repo.declare("fetch", &names).await.unwrap();
        let second = repo.declare("fetch", &names).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_declare_returns_whole_stage() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.declare("fetch", &["pages".to_string()]).await.unwrap();
        let ids = repo
            .declare("fetch", &["errors".to_string()])
            .await
            .unwrap();

        // Declaring one more metric still reports the existing one.
        assert!(ids.contains_key("pages"));
        assert!(ids.contains_key("errors"));
    }

    #[tokio::test]
    async fn test_get_data_filters_and_orders() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let ids = repo
            .declare("build", &["latency".to_string()])
            .await
            .unwrap();
        let id = ids["latency"];

        repo.add_data(&[
            Sample::new(id, 3_000, 3.0),
            Sample::new(id, 1_000, 1.0),
            Sample::new(id, 2_000, 2.0),
            Sample::new(id, 9_000, 9.0), // outside the range
        ])
        .await
        .unwrap();

        let points = repo.get_data(id, &range(1_000, 3_000)).await.unwrap();

        assert_eq!(
            points,
            vec![
                TimeSeriesPoint::new(1_000, 1.0),
                TimeSeriesPoint::new(2_000, 2.0),
                TimeSeriesPoint::new(3_000, 3.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_data_scopes_to_metric() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let ids = repo
            .declare("build", &["latency".to_string(), "errors".to_string()])
            .await
            .unwrap();

        repo.add_data(&[
            Sample::new(ids["latency"], 1_000, 1.0),
            Sample::new(ids["errors"], 1_000, 99.0),
        ])
        .await
        .unwrap();

        let points = repo
            .get_data(ids["latency"], &range(0, 2_000))
            .await
            .unwrap();

        assert_eq!(points, vec![TimeSeriesPoint::new(1_000, 1.0)]);
    }

    #[tokio::test]
    async fn test_list_metrics_spans_stages() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        repo.declare("fetch", &["pages".to_string()]).await.unwrap();
        repo.declare("parse", &["links".to_string()]).await.unwrap();

        let metrics = repo.list_metrics().await.unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].stage, "fetch");
        assert_eq!(metrics[1].label(), "parse links");
    }

    #[tokio::test]
    async fn test_stage_metrics_filters() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        repo.declare("fetch", &["pages".to_string()]).await.unwrap();
        repo.declare("parse", &["links".to_string()]).await.unwrap();

        let pairs = repo.stage_metrics("parse").await.unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, "links");
    }
}
