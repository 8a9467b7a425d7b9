use crate::error::{StorageError, StorageResult};
use crate::models::{HistoryEntry, NewParkingRecord, ParkingRecord};
use aptpark_core::{ParkingArea, Wing};
use sqlx::SqliteConnection;

/// Which history rows a view or report selects.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// `Resident` keeps slots up to 1200, `Guest` the spare slots
    pub area: Option<ParkingArea>,
    /// Wing of the owning resident
    pub wing: Option<Wing>,
    /// One resident's own history
    pub resident_id: Option<String>,
}

/// Archive a finished session and read back the stored row
///
/// `time_out` is the database clock; `total_hours` and `charge_amount` are
/// filled in by the schema during the insert.
pub async fn archive(
    conn: &mut SqliteConnection,
    record: &NewParkingRecord,
) -> StorageResult<ParkingRecord> {
    let result = sqlx::query(
        r#"
        INSERT INTO parking_records (
            Slot_id, vehicle_number, resident_id, vehicle_brand, vehicle_type, time_in, time_out
        )
        VALUES (?, ?, ?, ?, ?, ?, datetime('now', 'localtime'))
        "#,
    )
    .bind(record.slot_id)
    .bind(&record.vehicle_number)
    .bind(&record.resident_id)
    .bind(&record.vehicle_brand)
    .bind(record.vehicle_type.as_str())
    .bind(record.time_in)
    .execute(&mut *conn)
    .await?;

    let record_id = result.last_insert_rowid();
    find(conn, record_id)
        .await?
        .ok_or_else(|| StorageError::not_found("ParkingRecord", "record_id", record_id))
}

pub async fn find(
    conn: &mut SqliteConnection,
    record_id: i64,
) -> StorageResult<Option<ParkingRecord>> {
    let record =
        sqlx::query_as::<_, ParkingRecord>("SELECT * FROM parking_records WHERE record_id = ?")
            .bind(record_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(record)
}

/// History rows with owner names, most recent `time_out` first
pub async fn list(
    conn: &mut SqliteConnection,
    filter: &HistoryFilter,
) -> StorageResult<Vec<HistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT pr.record_id, pr.Slot_id, pr.vehicle_number, pr.resident_id, pr.vehicle_brand,
               pr.vehicle_type, pr.time_in, pr.time_out, pr.total_hours, pr.charge_amount,
               CASE WHEN r.resident_id IS NULL THEN NULL
                    ELSE r.first_name || ' ' || r.last_name END AS owner_name
        FROM parking_records pr
        LEFT JOIN residents r ON r.resident_id = pr.resident_id
        WHERE (?1 IS NULL
               OR (?1 = 'Resident' AND pr.Slot_id <= 1200)
               OR (?1 = 'Guest' AND pr.Slot_id > 1200))
          AND (?2 IS NULL OR r.wing = ?2)
          AND (?3 IS NULL OR pr.resident_id = ?3)
        ORDER BY pr.time_out DESC, pr.record_id DESC
        "#,
    )
    .bind(filter.area.map(ParkingArea::label))
    .bind(filter.wing.map(Wing::as_str))
    .bind(filter.resident_id.as_deref())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::models::Resident;
    use crate::repositories::residents;
    use aptpark_core::VehicleType;
    use chrono::NaiveDateTime;

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(slot_id: i64, resident_id: Option<&str>, time_in: Option<NaiveDateTime>) -> NewParkingRecord {
        NewParkingRecord {
            slot_id,
            vehicle_number: "GJ01AB1234".to_string(),
            resident_id: resident_id.map(str::to_string),
            vehicle_brand: "Honda".to_string(),
            vehicle_type: VehicleType::FourWheeler,
            time_in,
        }
    }

    #[tokio::test]
    async fn test_archive_computes_hours_and_resident_charge() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let stored = archive(&mut conn, &record(5, Some("RES001"), Some(at("2025-01-01 08:00:00"))))
            .await
            .unwrap();

        assert!(stored.record_id > 0);
        assert_eq!(stored.time_in, Some(at("2025-01-01 08:00:00")));
        assert!(stored.time_out > at("2025-01-01 08:00:00"));
        assert!(stored.total_hours > 0.0);
        assert_eq!(stored.charge_amount, 0.0);
        assert_eq!(stored.parking_type(), ParkingArea::Resident);
    }

    #[tokio::test]
    async fn test_guest_charge_per_started_hour() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        // Insert with explicit times to pin the computed columns
        sqlx::query(
            r#"
            INSERT INTO parking_records
                (Slot_id, vehicle_number, resident_id, vehicle_brand, vehicle_type, time_in, time_out)
            VALUES
                (1201, 'MH12CD0001', 'RES001', 'Kia', '4-wheeler', '2025-01-01 08:00:00', '2025-01-01 10:30:00'),
                (1202, 'MH12CD0002', 'RES001', 'Kia', '4-wheeler', '2025-01-01 08:00:00', '2025-01-01 08:10:00'),
                (1203, 'MH12CD0003', 'RES001', 'Kia', '4-wheeler', '2025-01-01 08:00:00', '2025-01-01 11:00:00')
            "#,
        )
        .execute(&mut *conn)
        .await
        .unwrap();

        let rows: Vec<(f64, f64)> = sqlx::query_as(
            "SELECT total_hours, charge_amount FROM parking_records ORDER BY Slot_id",
        )
        .fetch_all(&mut *conn)
        .await
        .unwrap();

        assert_eq!(rows, vec![(2.5, 60.0), (0.17, 20.0), (3.0, 60.0)]);
    }

    #[tokio::test]
    async fn test_terminating_row_has_zero_charge() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let stored = archive(&mut conn, &record(1210, Some("RES001"), None)).await.unwrap();

        assert_eq!(stored.time_in, None);
        assert_eq!(stored.total_hours, 0.0);
        assert_eq!(stored.charge_amount, 0.0);
    }

    #[tokio::test]
    async fn test_history_is_insert_only() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let stored = archive(&mut conn, &record(5, None, Some(at("2025-01-01 08:00:00"))))
            .await
            .unwrap();

        let update = sqlx::query("UPDATE parking_records SET time_in = NULL WHERE record_id = ?")
            .bind(stored.record_id)
            .execute(&mut *conn)
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM parking_records")
            .execute(&mut *conn)
            .await;
        assert!(delete.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_owner_names() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        residents::insert(&mut conn, &Resident::admitted(1, "amit", "shah", "9876543210", Wing::A, 1))
            .await
            .unwrap();

        let t = Some(at("2025-01-01 08:00:00"));
        archive(&mut conn, &record(5, Some("RES001"), t)).await.unwrap();
        archive(&mut conn, &record(1201, Some("RES001"), t)).await.unwrap();
        archive(&mut conn, &record(7, Some("RES099"), t)).await.unwrap();

        let all = list(&mut conn, &HistoryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let orphan = all.iter().find(|e| e.record.slot_id == 7).unwrap();
        assert_eq!(orphan.owner_display(), "N/A");

        let guests = list(
            &mut conn,
            &HistoryFilter {
                area: Some(ParkingArea::Guest),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].owner_display(), "amit shah");

        let wing_a = list(
            &mut conn,
            &HistoryFilter {
                wing: Some(Wing::A),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(wing_a.len(), 2);

        let mine = list(
            &mut conn,
            &HistoryFilter {
                area: Some(ParkingArea::Resident),
                resident_id: Some("RES001".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].record.slot_id, 5);
    }
}
