use crate::error::{StorageError, StorageResult};
use crate::models::Resident;
use aptpark_core::{SubscriptionTier, Wing};
use chrono::NaiveDate;
use sqlx::SqliteConnection;

/// Insert a fully derived resident row
///
/// # Errors
///
/// Returns a database error on a duplicate id, contact number or username.
pub async fn insert(conn: &mut SqliteConnection, resident: &Resident) -> StorageResult<()> {
    sqlx::query(
        r#"
        INSERT INTO residents (
            resident_id, first_name, last_name, contact_number, wing, house_number,
            subscription_tier, subscription_cost, subscription_start_date,
            subscription_valid_until, vehicle_count, username, password
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&resident.resident_id)
    .bind(&resident.first_name)
    .bind(&resident.last_name)
    .bind(&resident.contact_number)
    .bind(resident.wing.as_str())
    .bind(resident.house_number)
    .bind(resident.subscription_tier.as_str())
    .bind(resident.subscription_cost)
    .bind(resident.subscription_start_date)
    .bind(resident.subscription_valid_until)
    .bind(resident.vehicle_count)
    .bind(&resident.username)
    .bind(&resident.password)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> StorageResult<Option<Resident>> {
    let resident = sqlx::query_as::<_, Resident>("SELECT * FROM residents WHERE resident_id = ?")
        .bind(resident_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(resident)
}

/// Find a resident by exact (case-sensitive) username
pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> StorageResult<Option<Resident>> {
    let resident = sqlx::query_as::<_, Resident>("SELECT * FROM residents WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(resident)
}

/// `true` when a resident with this id exists
pub async fn exists(conn: &mut SqliteConnection, resident_id: &str) -> StorageResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM residents WHERE resident_id = ? LIMIT 1")
            .bind(resident_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(found.is_some())
}

/// Highest serial in use, zero when there are no residents
///
/// Serials of deleted residents may be reused once they are no longer the
/// maximum.
pub async fn next_serial(conn: &mut SqliteConnection) -> StorageResult<i64> {
    let serial: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(CAST(substr(resident_id, 4) AS INTEGER)), 0) FROM residents",
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(serial)
}

pub async fn count(conn: &mut SqliteConnection) -> StorageResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM residents")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn count_in_wing(conn: &mut SqliteConnection, wing: Wing) -> StorageResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM residents WHERE wing = ?")
        .bind(wing.as_str())
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Smallest house number not taken in the wing, starting at 1
///
/// Numbers freed by deleted residents are handed out again before the wing
/// grows past its current highest number.
pub async fn next_house_number(conn: &mut SqliteConnection, wing: Wing) -> StorageResult<i64> {
    let house: i64 = sqlx::query_scalar(
        r#"
        SELECT CASE
            WHEN NOT EXISTS (SELECT 1 FROM residents WHERE wing = ?1 AND house_number = 1) THEN 1
            ELSE (
                SELECT MIN(r.house_number + 1) FROM residents r
                WHERE r.wing = ?1 AND NOT EXISTS (
                    SELECT 1 FROM residents n
                    WHERE n.wing = ?1 AND n.house_number = r.house_number + 1
                )
            )
        END
        "#,
    )
    .bind(wing.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(house)
}

/// `true` when another resident already logs in with this username
///
/// `exclude` skips the resident being edited.
pub async fn username_exists(
    conn: &mut SqliteConnection,
    username: &str,
    exclude: Option<&str>,
) -> StorageResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM residents
        WHERE username = ?1 AND (?2 IS NULL OR resident_id <> ?2)
        LIMIT 1
        "#,
    )
    .bind(username)
    .bind(exclude)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(found.is_some())
}

/// `true` when another resident already uses this contact number
///
/// `exclude` skips the resident being edited.
pub async fn contact_exists(
    conn: &mut SqliteConnection,
    contact_number: &str,
    exclude: Option<&str>,
) -> StorageResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM residents
        WHERE contact_number = ?1 AND (?2 IS NULL OR resident_id <> ?2)
        LIMIT 1
        "#,
    )
    .bind(contact_number)
    .bind(exclude)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(found.is_some())
}

/// All residents ordered by id, optionally restricted to one wing
pub async fn list(conn: &mut SqliteConnection, wing: Option<Wing>) -> StorageResult<Vec<Resident>> {
    let residents = sqlx::query_as::<_, Resident>(
        r#"
        SELECT * FROM residents
        WHERE ?1 IS NULL OR wing = ?1
        ORDER BY resident_id
        "#,
    )
    .bind(wing.map(Wing::as_str))
    .fetch_all(&mut *conn)
    .await?;

    Ok(residents)
}

/// Persist name, contact and the recomputed credentials
pub async fn update_profile(conn: &mut SqliteConnection, resident: &Resident) -> StorageResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE residents
        SET first_name = ?, last_name = ?, contact_number = ?, username = ?, password = ?
        WHERE resident_id = ?
        "#,
    )
    .bind(&resident.first_name)
    .bind(&resident.last_name)
    .bind(&resident.contact_number)
    .bind(&resident.username)
    .bind(&resident.password)
    .bind(&resident.resident_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(
            "Resident",
            "resident_id",
            &resident.resident_id,
        ));
    }

    Ok(())
}

/// Record a purchased subscription period
pub async fn update_subscription(
    conn: &mut SqliteConnection,
    resident_id: &str,
    tier: SubscriptionTier,
    start: NaiveDate,
    valid_until: NaiveDate,
) -> StorageResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE residents
        SET subscription_tier = ?, subscription_cost = ?,
            subscription_start_date = ?, subscription_valid_until = ?
        WHERE resident_id = ?
        "#,
    )
    .bind(tier.as_str())
    .bind(tier.price())
    .bind(start)
    .bind(valid_until)
    .bind(resident_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Resident", "resident_id", resident_id));
    }

    Ok(())
}

/// Add `delta` (normally +1 or -1) to the resident's registered vehicle count
pub async fn adjust_vehicle_count(
    conn: &mut SqliteConnection,
    resident_id: &str,
    delta: i64,
) -> StorageResult<()> {
    let result =
        sqlx::query("UPDATE residents SET vehicle_count = vehicle_count + ? WHERE resident_id = ?")
            .bind(delta)
            .bind(resident_id)
            .execute(&mut *conn)
            .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Resident", "resident_id", resident_id));
    }

    Ok(())
}

/// Delete a resident; the schema cascades to vehicles and active parking
pub async fn delete(conn: &mut SqliteConnection, resident_id: &str) -> StorageResult<()> {
    let result = sqlx::query("DELETE FROM residents WHERE resident_id = ?")
        .bind(resident_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Resident", "resident_id", resident_id));
    }

    Ok(())
}
