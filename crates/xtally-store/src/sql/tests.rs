//! Tests for the SQL storage backend.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::Row;
use tokio::task::JoinSet;
use xtally_core::{ConnectionEvent, HourlyUsage};

use crate::sql::{DatabaseType, SqlStore, SqlStoreConfig};
use crate::{StoreError, TrafficStore};

/// Create a test SqlStore with in-memory SQLite.
async fn setup_test_db() -> SqlStore {
    let config = SqlStoreConfig::new("sqlite::memory:").max_connections(1);
    SqlStore::connect(config).await.expect("Failed to connect")
}

fn sample_event(user: &str) -> ConnectionEvent {
    ConnectionEvent {
        user: user.into(),
        ip: "203.0.113.5".into(),
        target: "example.com:443".into(),
        inbound: "in1".into(),
        outbound: "out1".into(),
        request_time: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        server: "tokyo-1".into(),
    }
}

#[tokio::test]
async fn test_database_type_detection() {
    assert_eq!(
        DatabaseType::from_url("postgres://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("postgresql://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("mysql://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("mariadb://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("sqlite::memory:"),
        Some(DatabaseType::SQLite)
    );
    assert_eq!(DatabaseType::from_url("redis://localhost"), None);
}

#[tokio::test]
async fn test_unsupported_url_rejected() {
    let result = SqlStore::connect(SqlStoreConfig::new("redis://localhost")).await;
    assert!(matches!(result, Err(StoreError::UnsupportedUrl(s)) if s == "redis"));
}

#[tokio::test]
async fn test_schema_is_idempotent() {
    let store = setup_test_db().await;
    store.create_schema().await.expect("second schema pass");
    assert_eq!(store.database_type(), DatabaseType::SQLite);
}

#[tokio::test]
async fn test_insert_event_stores_all_columns() {
    let store = setup_test_db().await;
    store.insert_event(&sample_event("alice")).await.unwrap();

    let row = sqlx::query(
        "SELECT user, ip, target, inbound, outbound, timestamp, server FROM xray_log",
    )
    .fetch_one(store.pool())
    .await
    .unwrap();

    assert_eq!(row.get::<String, _>("user"), "alice");
    assert_eq!(row.get::<String, _>("ip"), "203.0.113.5");
    assert_eq!(row.get::<String, _>("target"), "example.com:443");
    assert_eq!(row.get::<String, _>("inbound"), "in1");
    assert_eq!(row.get::<String, _>("outbound"), "out1");
    assert_eq!(row.get::<String, _>("timestamp"), "2024-01-01 10:00:00");
    assert_eq!(row.get::<String, _>("server"), "tokyo-1");
}

#[tokio::test]
async fn test_add_hourly_usage_inserts_then_accumulates() {
    let store = setup_test_db().await;

    let first = store
        .add_hourly_usage("bob", "2024-01-01", "10:00", 100, 200)
        .await
        .unwrap();
    assert_eq!((first.up, first.down), (100, 200));

    let second = store
        .add_hourly_usage("bob", "2024-01-01", "10:00", 50, 25)
        .await
        .unwrap();
    assert_eq!((second.up, second.down), (150, 225));

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM xray_user_stats")
        .fetch_one(store.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_find_update_roundtrip() {
    let store = setup_test_db().await;
    assert!(
        store
            .hourly_usage("carol", "2024-01-01", "09:00")
            .await
            .unwrap()
            .is_none()
    );

    let mut usage = store
        .add_hourly_usage("carol", "2024-01-01", "09:00", 1, 2)
        .await
        .unwrap();
    usage.up = 10;
    usage.down = 20;
    store.update_hourly_usage(&usage).await.unwrap();

    let found = store
        .hourly_usage("carol", "2024-01-01", "09:00")
        .await
        .unwrap()
        .expect("bucket exists");
    assert_eq!(found, usage);
}

#[tokio::test]
async fn test_daily_usage_filters_by_date() {
    let store = setup_test_db().await;
    store
        .add_hourly_usage("alice", "2024-01-01", "10:00", 1, 1)
        .await
        .unwrap();
    store
        .add_hourly_usage("bob", "2024-01-01", "09:00", 2, 2)
        .await
        .unwrap();
    store
        .add_hourly_usage("alice", "2024-01-02", "10:00", 3, 3)
        .await
        .unwrap();

    let day = store.daily_usage("2024-01-01").await.unwrap();
    let keys: Vec<_> = day.iter().map(|u| (u.user.as_str(), u.time.as_str())).collect();
    assert_eq!(keys, [("bob", "09:00"), ("alice", "10:00")]);
}

#[tokio::test]
async fn test_concurrent_adds_share_one_bucket() {
    let store = Arc::new(setup_test_db().await);

    let mut tasks = JoinSet::new();
    for i in 0..16_i64 {
        let store = store.clone();
        tasks.spawn(async move {
            store
                .add_hourly_usage("dave", "2024-01-01", "11:00", i, 2 * i)
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let rows = store.daily_usage("2024-01-01").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].up, rows[0].down), (120, 240));
}

#[tokio::test]
async fn test_bucket_key_is_unique() {
    let store = setup_test_db().await;
    let usage = HourlyUsage {
        user: "erin".into(),
        date: "2024-01-01".into(),
        time: "12:00".into(),
        down: 1,
        up: 1,
    };
    store.insert_hourly_usage(&usage).await.unwrap();

    let result = store.insert_hourly_usage(&usage).await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}
