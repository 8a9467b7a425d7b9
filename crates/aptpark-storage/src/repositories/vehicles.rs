use crate::error::{StorageError, StorageResult};
use crate::models::{Vehicle, VehicleStatus, VehicleWithOwner};
use aptpark_core::VehicleType;
use sqlx::SqliteConnection;

/// Columns a vehicle listing may be sorted by.
pub const SORT_COLUMNS: [&str; 4] = ["resident_id", "vehicle_type", "vehicle_brand", "vehicle_number"];

/// Map a requested sort column onto the allow-list.
///
/// Anything outside [`SORT_COLUMNS`] falls back to `vehicle_number`.
///
/// # Examples
///
/// ```
/// use aptpark_storage::repositories::vehicles::sort_column;
///
/// assert_eq!(sort_column("vehicle_brand"), "vehicle_brand");
/// assert_eq!(sort_column("1; DROP TABLE vehicle"), "vehicle_number");
/// ```
pub fn sort_column(requested: &str) -> &'static str {
    SORT_COLUMNS
        .iter()
        .find(|column| **column == requested)
        .copied()
        .unwrap_or("vehicle_number")
}

pub async fn insert(conn: &mut SqliteConnection, vehicle: &Vehicle) -> StorageResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vehicle (vehicle_number, resident_id, vehicle_type, vehicle_brand, owner_type)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&vehicle.vehicle_number)
    .bind(&vehicle.resident_id)
    .bind(vehicle.vehicle_type.as_str())
    .bind(&vehicle.vehicle_brand)
    .bind(vehicle.owner_type.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn find(conn: &mut SqliteConnection, vehicle_number: &str) -> StorageResult<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicle WHERE vehicle_number = ?")
        .bind(vehicle_number)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(vehicle)
}

/// `true` when the plate is registered anywhere, guest or resident
pub async fn exists(conn: &mut SqliteConnection, vehicle_number: &str) -> StorageResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM vehicle WHERE vehicle_number = ? LIMIT 1")
            .bind(vehicle_number)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(found.is_some())
}

/// Every vehicle registered under the resident, guests included
pub async fn list_for_resident(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        "SELECT * FROM vehicle WHERE resident_id = ? ORDER BY vehicle_number",
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(vehicles)
}

/// The resident's vehicles with the slot each one occupies, if any
pub async fn statuses_for_resident(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Vec<VehicleStatus>> {
    let statuses = sqlx::query_as::<_, VehicleStatus>(
        r#"
        SELECT v.vehicle_number, v.resident_id, v.vehicle_type, v.vehicle_brand, v.owner_type,
               COALESCE(p.Slot_id, s.Slot_id) AS parked_slot
        FROM vehicle v
        LEFT JOIN parked_vehicle p ON p.vehicle_number = v.vehicle_number
        LEFT JOIN spare_parked_vehicle s ON s.vehicle_number = v.vehicle_number
        WHERE v.resident_id = ?
        ORDER BY v.vehicle_number
        "#,
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(statuses)
}

/// Vehicles of the resident that occupy a slot in either parking table
pub async fn currently_parked_for_resident(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT v.* FROM vehicle v
        WHERE v.resident_id = ?
          AND (v.vehicle_number IN (SELECT vehicle_number FROM parked_vehicle)
               OR v.vehicle_number IN (SELECT vehicle_number FROM spare_parked_vehicle))
        ORDER BY v.vehicle_number
        "#,
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(vehicles)
}

/// Resident-owned vehicles of the resident that are not parked anywhere
pub async fn unparked_for_resident(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT v.* FROM vehicle v
        WHERE v.resident_id = ? AND v.owner_type = 'Resident'
          AND v.vehicle_number NOT IN (SELECT vehicle_number FROM parked_vehicle)
          AND v.vehicle_number NOT IN (SELECT vehicle_number FROM spare_parked_vehicle)
        ORDER BY v.vehicle_number
        "#,
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(vehicles)
}

/// All registered vehicles sorted by an allow-listed column
pub async fn list_all(conn: &mut SqliteConnection, sort_by: &str) -> StorageResult<Vec<Vehicle>> {
    // The column name comes from the allow-list, never from input
    let sql = format!(
        "SELECT * FROM vehicle ORDER BY {}, vehicle_number",
        sort_column(sort_by)
    );
    let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
        .fetch_all(&mut *conn)
        .await?;

    Ok(vehicles)
}

/// Vehicle lookup including the owner's full name
pub async fn find_with_owner(
    conn: &mut SqliteConnection,
    vehicle_number: &str,
) -> StorageResult<Option<VehicleWithOwner>> {
    let found = sqlx::query_as::<_, VehicleWithOwner>(
        r#"
        SELECT v.vehicle_number, v.resident_id, v.vehicle_type, v.vehicle_brand, v.owner_type,
               r.first_name || ' ' || r.last_name AS owner_name
        FROM vehicle v
        JOIN residents r ON r.resident_id = v.resident_id
        WHERE v.vehicle_number = ?
        "#,
    )
    .bind(vehicle_number)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(found)
}

/// Registered vehicles that count toward the resident's subscription caps
///
/// Counts the resident's vehicles not currently in spare parking, split by
/// type. Guest vehicles only exist while they hold a spare slot, so the
/// anti-join leaves exactly the permanent registrations.
///
/// Returns `(four_wheelers, two_wheelers)`.
pub async fn resident_vehicle_counts(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<(i64, i64)> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT v.vehicle_type, COUNT(*)
        FROM vehicle v
        LEFT JOIN spare_parked_vehicle s ON s.vehicle_number = v.vehicle_number
        WHERE v.resident_id = ? AND s.vehicle_number IS NULL
        GROUP BY v.vehicle_type
        "#,
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut counts = (0, 0);
    for (vehicle_type, count) in rows {
        match vehicle_type.parse::<VehicleType>()? {
            VehicleType::FourWheeler => counts.0 = count,
            VehicleType::TwoWheeler => counts.1 = count,
        }
    }

    Ok(counts)
}

/// Delete a vehicle; the schema cascades to its active parking row
pub async fn delete(conn: &mut SqliteConnection, vehicle_number: &str) -> StorageResult<()> {
    let result = sqlx::query("DELETE FROM vehicle WHERE vehicle_number = ?")
        .bind(vehicle_number)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Vehicle", "vehicle_number", vehicle_number));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::models::Resident;
    use crate::repositories::{parking, residents};
    use aptpark_core::{ParkingArea, Wing};
    use rstest::rstest;

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    async fn seed_resident(conn: &mut SqliteConnection) {
        let r = Resident::admitted(1, "amit", "shah", "9876543210", Wing::A, 1);
        residents::insert(conn, &r).await.unwrap();
    }

    #[rstest]
    #[case("resident_id", "resident_id")]
    #[case("vehicle_type", "vehicle_type")]
    #[case("vehicle_brand", "vehicle_brand")]
    #[case("vehicle_number", "vehicle_number")]
    #[case("owner_type", "vehicle_number")]
    #[case("", "vehicle_number")]
    #[case("vehicle_brand DESC", "vehicle_number")]
    fn test_sort_column_allow_list(#[case] requested: &str, #[case] expected: &str) {
        assert_eq!(sort_column(requested), expected);
    }

    #[tokio::test]
    async fn test_insert_find_and_exists() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        seed_resident(&mut conn).await;

        let car = Vehicle::resident_owned("GJ01AB1234", "RES001", VehicleType::FourWheeler, "Honda");
        insert(&mut conn, &car).await.unwrap();

        assert_eq!(find(&mut conn, "GJ01AB1234").await.unwrap(), Some(car.clone()));
        assert!(exists(&mut conn, "GJ01AB1234").await.unwrap());
        assert!(!exists(&mut conn, "GJ01AB9999").await.unwrap());

        // Plates are globally unique
        assert!(insert(&mut conn, &car).await.is_err());

        let with_owner = find_with_owner(&mut conn, "GJ01AB1234").await.unwrap().unwrap();
        assert_eq!(with_owner.owner_name, "amit shah");
    }

    #[tokio::test]
    async fn test_counts_exclude_guest_vehicles_in_spare() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        seed_resident(&mut conn).await;

        for (number, vt) in [
            ("GJ01AB0001", VehicleType::FourWheeler),
            ("GJ01AB0002", VehicleType::TwoWheeler),
            ("GJ01AB0003", VehicleType::TwoWheeler),
        ] {
            insert(&mut conn, &Vehicle::resident_owned(number, "RES001", vt, "Brand"))
                .await
                .unwrap();
        }
        let guest = Vehicle::guest("MH12CD0001", "RES001", VehicleType::FourWheeler, "Kia");
        insert(&mut conn, &guest).await.unwrap();
        parking::occupy(&mut conn, ParkingArea::Guest, 1201, "MH12CD0001")
            .await
            .unwrap();

        assert_eq!(resident_vehicle_counts(&mut conn, "RES001").await.unwrap(), (1, 2));
        assert_eq!(resident_vehicle_counts(&mut conn, "RES404").await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_parked_and_unparked_split() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        seed_resident(&mut conn).await;

        insert(&mut conn, &Vehicle::resident_owned("GJ01AB0001", "RES001", VehicleType::FourWheeler, "Honda"))
            .await
            .unwrap();
        insert(&mut conn, &Vehicle::resident_owned("GJ01AB0002", "RES001", VehicleType::TwoWheeler, "Hero"))
            .await
            .unwrap();
        parking::occupy(&mut conn, ParkingArea::Resident, 5, "GJ01AB0001")
            .await
            .unwrap();

        let parked = currently_parked_for_resident(&mut conn, "RES001").await.unwrap();
        assert_eq!(parked.len(), 1);
        assert_eq!(parked[0].vehicle_number, "GJ01AB0001");

        let unparked = unparked_for_resident(&mut conn, "RES001").await.unwrap();
        assert_eq!(unparked.len(), 1);
        assert_eq!(unparked[0].vehicle_number, "GJ01AB0002");

        let statuses = statuses_for_resident(&mut conn, "RES001").await.unwrap();
        assert_eq!(statuses[0].location(), "Resident Parking");
        assert_eq!(statuses[1].location(), "-");
    }

    #[tokio::test]
    async fn test_list_all_sorted_and_delete() {
        let db = setup_test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        seed_resident(&mut conn).await;

        insert(&mut conn, &Vehicle::resident_owned("GJ01AB0002", "RES001", VehicleType::FourWheeler, "Audi"))
            .await
            .unwrap();
        insert(&mut conn, &Vehicle::resident_owned("GJ01AB0001", "RES001", VehicleType::TwoWheeler, "Yamaha"))
            .await
            .unwrap();

        let by_number = list_all(&mut conn, "bogus").await.unwrap();
        assert_eq!(by_number[0].vehicle_number, "GJ01AB0001");

        let by_brand = list_all(&mut conn, "vehicle_brand").await.unwrap();
        assert_eq!(by_brand[0].vehicle_brand, "Audi");

        delete(&mut conn, "GJ01AB0002").await.unwrap();
        assert_eq!(list_for_resident(&mut conn, "RES001").await.unwrap().len(), 1);
        assert!(matches!(
            delete(&mut conn, "GJ01AB0002").await,
            Err(StorageError::NotFound { .. })
        ));
    }
}
