//! Integration tests for the storage gateway
//!
//! These tests open file-backed and in-memory SQLite databases and verify
//! migrations, persistence across reopen, and transaction scoping on the
//! single pooled connection.
//!
//! Run with: cargo test --package aptpark-storage --test integration_database

use aptpark_core::{VehicleType, Wing};
use aptpark_storage::connection::{Database, DatabaseConfig};
use aptpark_storage::models::{Resident, Vehicle};
use aptpark_storage::repositories::{residents, vehicles};
use aptpark_storage::transaction;
use std::time::Duration;

#[tokio::test]
async fn test_in_memory_database() {
    let db = Database::in_memory().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn test_migration_idempotency() {
    let db = Database::in_memory().await.unwrap();

    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    for table in [
        "admin",
        "residents",
        "vehicle",
        "parked_vehicle",
        "spare_parked_vehicle",
        "parking_records",
        "guest_waiting_list",
    ] {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(table)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1, "missing table {table}");
    }

    let (admins,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(admins, 1);

    db.close().await;
}

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("aptpark.db");
    let path = path.to_string_lossy().to_string();

    {
        let db = Database::new(DatabaseConfig::new(&path)).await.unwrap();
        let mut tx = transaction::begin(&db).await.unwrap();
        residents::insert(
            &mut tx,
            &Resident::admitted(1, "amit", "shah", "9876543210", Wing::A, 1),
        )
        .await
        .unwrap();
        transaction::commit(tx).await.unwrap();
        db.close().await;
    }

    let db = Database::new(DatabaseConfig::new(&path)).await.unwrap();
    let mut conn = db.pool().acquire().await.unwrap();
    assert!(residents::exists(&mut conn, "RES001").await.unwrap());
    drop(conn);
    db.close().await;
}

#[tokio::test]
async fn test_missing_database_without_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let config = DatabaseConfig::new(path.to_string_lossy())
        .create_if_missing(false)
        .acquire_timeout(Duration::from_secs(2));

    assert!(Database::new(config).await.is_err());
}

#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_trace() {
    let db = Database::in_memory().await.unwrap();

    let mut tx = transaction::begin(&db).await.unwrap();
    residents::insert(
        &mut tx,
        &Resident::admitted(1, "amit", "shah", "9876543210", Wing::A, 1),
    )
    .await
    .unwrap();
    vehicles::insert(
        &mut tx,
        &Vehicle::resident_owned("GJ01AB1234", "RES001", VehicleType::FourWheeler, "Honda"),
    )
    .await
    .unwrap();
    residents::adjust_vehicle_count(&mut tx, "RES001", 1).await.unwrap();
    transaction::rollback(tx).await;

    let mut conn = db.pool().acquire().await.unwrap();
    assert!(!residents::exists(&mut conn, "RES001").await.unwrap());
    assert!(!vehicles::exists(&mut conn, "GJ01AB1234").await.unwrap());
}

#[tokio::test]
async fn test_sequential_transactions_on_single_connection() {
    let db = Database::in_memory().await.unwrap();

    for serial in 1..=5 {
        let mut tx = transaction::begin(&db).await.unwrap();
        let next = residents::next_serial(&mut tx).await.unwrap() + 1;
        assert_eq!(next, serial);
        let contact = format!("90000000{serial:02}");
        residents::insert(
            &mut tx,
            &Resident::admitted(next, "user", "test", &contact, Wing::B, serial),
        )
        .await
        .unwrap();
        transaction::commit(tx).await.unwrap();
    }

    let mut conn = db.pool().acquire().await.unwrap();
    assert_eq!(residents::count_in_wing(&mut conn, Wing::B).await.unwrap(), 5);
}
