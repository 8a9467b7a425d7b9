use crate::error::StorageResult;
use crate::models::{NewWaitlistEntry, WaitlistEntry};
use sqlx::SqliteConnection;

/// Append a guest vehicle; the database allocates the id and `time_added`
pub async fn insert(
    conn: &mut SqliteConnection,
    entry: &NewWaitlistEntry,
) -> StorageResult<WaitlistEntry> {
    let stored = sqlx::query_as::<_, WaitlistEntry>(
        r#"
        INSERT INTO guest_waiting_list (resident_id, vehicle_number, vehicle_brand, vehicle_type)
        VALUES (?, ?, ?, ?)
        RETURNING waitlist_id, resident_id, vehicle_number, vehicle_brand, vehicle_type, time_added
        "#,
    )
    .bind(&entry.resident_id)
    .bind(&entry.vehicle_number)
    .bind(&entry.vehicle_brand)
    .bind(entry.vehicle_type.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(stored)
}

/// Delete one entry, returning the number of rows removed (0 or 1)
pub async fn delete(conn: &mut SqliteConnection, waitlist_id: i64) -> StorageResult<u64> {
    let result = sqlx::query("DELETE FROM guest_waiting_list WHERE waitlist_id = ?")
        .bind(waitlist_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// The oldest `limit` entries in arrival order
pub async fn load_in_arrival_order(
    conn: &mut SqliteConnection,
    limit: usize,
) -> StorageResult<Vec<WaitlistEntry>> {
    let entries = sqlx::query_as::<_, WaitlistEntry>(
        r#"
        SELECT waitlist_id, resident_id, vehicle_number, vehicle_brand, vehicle_type, time_added
        FROM guest_waiting_list
        ORDER BY time_added ASC, waitlist_id ASC
        LIMIT ?
        "#,
    )
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(&mut *conn)
    .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use aptpark_core::VehicleType;

    fn new_entry(number: &str) -> NewWaitlistEntry {
        NewWaitlistEntry {
            resident_id: "RES001".to_string(),
            vehicle_number: number.to_string(),
            vehicle_brand: "Kia".to_string(),
            vehicle_type: VehicleType::FourWheeler,
        }
    }

    #[tokio::test]
    async fn test_insert_allocates_id_and_time() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let first = insert(&mut conn, &new_entry("MH12CD0001")).await.unwrap();
        let second = insert(&mut conn, &new_entry("MH12CD0002")).await.unwrap();

        assert!(second.waitlist_id > first.waitlist_id);
        assert_eq!(first.vehicle_type, VehicleType::FourWheeler);
        assert_eq!(load_in_arrival_order(&mut conn, 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_in_arrival_order_with_limit() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        // Explicit times out of id order
        sqlx::query(
            r#"
            INSERT INTO guest_waiting_list (resident_id, vehicle_number, vehicle_brand, vehicle_type, time_added)
            VALUES ('RES001', 'MH12CD0003', 'Kia', '4-wheeler', '2025-01-01 10:00:00'),
                   ('RES001', 'MH12CD0001', 'Kia', '4-wheeler', '2025-01-01 08:00:00'),
                   ('RES001', 'MH12CD0002', 'Kia', '2-wheeler', '2025-01-01 09:00:00')
            "#,
        )
        .execute(&mut *conn)
        .await
        .unwrap();

        let loaded = load_in_arrival_order(&mut conn, 2).await.unwrap();
        let numbers: Vec<&str> = loaded.iter().map(|e| e.vehicle_number.as_str()).collect();
        assert_eq!(numbers, vec!["MH12CD0001", "MH12CD0002"]);
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let entry = insert(&mut conn, &new_entry("MH12CD0001")).await.unwrap();
        assert_eq!(delete(&mut conn, entry.waitlist_id).await.unwrap(), 1);
        assert_eq!(delete(&mut conn, entry.waitlist_id).await.unwrap(), 0);
    }
}
