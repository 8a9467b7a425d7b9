use crate::error::{StorageError, StorageResult};
use crate::models::{ActiveParking, ParkedSlot, ParkedVehicleView};
use aptpark_core::{ParkingArea, SlotState, Wing};
use sqlx::SqliteConnection;

/// Active parking table holding the given area's slots.
fn table(area: ParkingArea) -> &'static str {
    match area {
        ParkingArea::Resident => "parked_vehicle",
        ParkingArea::Guest => "spare_parked_vehicle",
    }
}

/// Filter for the administrator's parked-vehicle views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParkedFilter {
    /// Restrict to one parking table
    pub area: Option<ParkingArea>,
    /// Restrict to vehicles whose resident lives in this wing
    pub wing: Option<Wing>,
}

/// Put a vehicle in a slot, stamping `time_in` with the database clock
///
/// # Errors
///
/// Fails on an occupied slot, a slot outside the area's range, an unknown
/// vehicle, or a vehicle that already occupies a slot in either table.
pub async fn occupy(
    conn: &mut SqliteConnection,
    area: ParkingArea,
    slot_id: i64,
    vehicle_number: &str,
) -> StorageResult<ParkedSlot> {
    let sql = format!(
        "INSERT INTO {} (Slot_id, vehicle_number) VALUES (?, ?) RETURNING Slot_id, vehicle_number, time_in",
        table(area)
    );
    let parked = sqlx::query_as::<_, ParkedSlot>(&sql)
        .bind(slot_id)
        .bind(vehicle_number)
        .fetch_one(&mut *conn)
        .await?;

    Ok(parked)
}

/// Row occupying `slot_id`, looked up in the table its range belongs to
pub async fn find_by_slot(
    conn: &mut SqliteConnection,
    slot_id: i64,
) -> StorageResult<Option<ParkedSlot>> {
    let Some(area) = ParkingArea::for_slot(slot_id) else {
        return Ok(None);
    };

    let sql = format!(
        "SELECT Slot_id, vehicle_number, time_in FROM {} WHERE Slot_id = ?",
        table(area)
    );
    let parked = sqlx::query_as::<_, ParkedSlot>(&sql)
        .bind(slot_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(parked)
}

/// Free or occupied. Slots outside both ranges report `Free`; callers
/// range-check before asking.
pub async fn slot_state(conn: &mut SqliteConnection, slot_id: i64) -> StorageResult<SlotState> {
    Ok(match find_by_slot(conn, slot_id).await? {
        Some(_) => SlotState::Occupied,
        None => SlotState::Free,
    })
}

/// Slot currently held by a vehicle, from either table
pub async fn find_by_vehicle(
    conn: &mut SqliteConnection,
    vehicle_number: &str,
) -> StorageResult<Option<ParkedSlot>> {
    let parked = sqlx::query_as::<_, ParkedSlot>(
        r#"
        SELECT Slot_id, vehicle_number, time_in FROM parked_vehicle WHERE vehicle_number = ?1
        UNION ALL
        SELECT Slot_id, vehicle_number, time_in FROM spare_parked_vehicle WHERE vehicle_number = ?1
        "#,
    )
    .bind(vehicle_number)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(parked)
}

/// Remove a vehicle's row from the given table
pub async fn release(
    conn: &mut SqliteConnection,
    area: ParkingArea,
    vehicle_number: &str,
) -> StorageResult<()> {
    let sql = format!("DELETE FROM {} WHERE vehicle_number = ?", table(area));
    let result = sqlx::query(&sql)
        .bind(vehicle_number)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(table(area), "vehicle_number", vehicle_number));
    }

    Ok(())
}

/// Resident slots held by vehicles of residents living in `wing`
pub async fn occupied_in_wing(conn: &mut SqliteConnection, wing: Wing) -> StorageResult<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM parked_vehicle p
        JOIN vehicle v ON v.vehicle_number = p.vehicle_number
        JOIN residents r ON r.resident_id = v.resident_id
        WHERE r.wing = ?
        "#,
    )
    .bind(wing.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Occupied spare (guest) slots
pub async fn occupied_spare(conn: &mut SqliteConnection) -> StorageResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM spare_parked_vehicle WHERE Slot_id BETWEEN 1201 AND 1350",
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Occupied slot numbers of one area in ascending order
pub async fn occupied_slots(conn: &mut SqliteConnection, area: ParkingArea) -> StorageResult<Vec<i64>> {
    let sql = format!("SELECT Slot_id FROM {} ORDER BY Slot_id", table(area));
    let slots: Vec<i64> = sqlx::query_scalar(&sql).fetch_all(&mut *conn).await?;

    Ok(slots)
}

/// All active sessions of the resident's vehicles, resident and guest
pub async fn active_for_resident(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Vec<ActiveParking>> {
    let rows = sqlx::query_as::<_, ActiveParking>(
        r#"
        SELECT p.Slot_id, p.vehicle_number, v.vehicle_brand, v.vehicle_type, p.time_in
        FROM parked_vehicle p
        JOIN vehicle v ON v.vehicle_number = p.vehicle_number
        WHERE v.resident_id = ?1
        UNION ALL
        SELECT s.Slot_id, s.vehicle_number, v.vehicle_brand, v.vehicle_type, s.time_in
        FROM spare_parked_vehicle s
        JOIN vehicle v ON v.vehicle_number = s.vehicle_number
        WHERE v.resident_id = ?1
        ORDER BY 1
        "#,
    )
    .bind(resident_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Parked vehicles with owner details, ordered by slot
pub async fn list_parked(
    conn: &mut SqliteConnection,
    filter: ParkedFilter,
) -> StorageResult<Vec<ParkedVehicleView>> {
    let rows = sqlx::query_as::<_, ParkedVehicleView>(
        r#"
        SELECT a.Slot_id, a.vehicle_number, v.vehicle_brand, v.vehicle_type, v.resident_id,
               r.first_name || ' ' || r.last_name AS owner_name, r.wing, a.time_in
        FROM (
            SELECT Slot_id, vehicle_number, time_in FROM parked_vehicle
            UNION ALL
            SELECT Slot_id, vehicle_number, time_in FROM spare_parked_vehicle
        ) a
        JOIN vehicle v ON v.vehicle_number = a.vehicle_number
        JOIN residents r ON r.resident_id = v.resident_id
        WHERE (?1 IS NULL
               OR (?1 = 'Resident' AND a.Slot_id <= 1200)
               OR (?1 = 'Guest' AND a.Slot_id > 1200))
          AND (?2 IS NULL OR r.wing = ?2)
        ORDER BY a.Slot_id
        "#,
    )
    .bind(filter.area.map(ParkingArea::label))
    .bind(filter.wing.map(Wing::as_str))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
