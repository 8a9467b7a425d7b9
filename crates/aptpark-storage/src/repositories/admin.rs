use crate::error::{StorageError, StorageResult};
use crate::models::Admin;
use sqlx::SqliteConnection;

/// Find an administrator by exact (case-sensitive) name
pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> StorageResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT name, password FROM admin WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(admin)
}

/// Replace the credentials of the administrator currently named `current_name`
pub async fn update_credentials(
    conn: &mut SqliteConnection,
    current_name: &str,
    new_name: &str,
    new_password: &str,
) -> StorageResult<()> {
    let result = sqlx::query("UPDATE admin SET name = ?, password = ? WHERE name = ?")
        .bind(new_name)
        .bind(new_password)
        .bind(current_name)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Admin", "name", current_name));
    }

    Ok(())
}
