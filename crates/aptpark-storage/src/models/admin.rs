use serde::{Deserialize, Serialize};

use super::credentials_match;

/// Administrator account (`admin` table).
///
/// The table normally holds one row, seeded by the initial migration and
/// replaced through the change-credentials flow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    /// Login name (primary key)
    pub name: String,

    /// Plain-text password, compared byte for byte
    #[serde(skip_serializing)]
    pub password: String,
}

impl Admin {
    /// Verify a login attempt in constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// use aptpark_storage::models::Admin;
    ///
    /// let admin = Admin { name: "admin".to_string(), password: "Admin@123".to_string() };
    /// assert!(admin.verify_password("Admin@123"));
    /// assert!(!admin.verify_password("ADMIN@123"));
    /// ```
    pub fn verify_password(&self, candidate: &str) -> bool {
        credentials_match(&self.password, candidate)
    }
}
