use aptpark_core::{SubscriptionTier, VehicleCaps, Wing};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::credentials_match;

/// Resident household registered in the complex
///
/// Residents are created by the tenancy service on admission with a
/// deterministic identifier, house number and login derived from their
/// details (see `aptpark_core::credentials`).
///
/// # Database Schema
///
/// Maps to the `residents` table:
/// - `resident_id` is the primary key (`RES001`, ...)
/// - `contact_number` and `username` are unique
/// - deleting a row cascades to the resident's vehicles and their active
///   parking rows
///
/// # Examples
///
/// ```
/// use aptpark_storage::models::Resident;
/// use aptpark_core::{SubscriptionTier, Wing};
///
/// let resident = Resident::admitted(1, "amit", "shah", "9876543210", Wing::A, 1);
///
/// assert_eq!(resident.resident_id, "RES001");
/// assert_eq!(resident.username, "amit1");
/// assert_eq!(resident.password, "3210@A#1");
/// assert_eq!(resident.subscription_tier, SubscriptionTier::Silver);
/// assert!(resident.verify_password("3210@A#1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resident {
    /// `RES` followed by the zero-padded serial
    pub resident_id: String,

    pub first_name: String,

    pub last_name: String,

    /// Ten digits, leading digit 6 to 9
    pub contact_number: String,

    #[sqlx(try_from = "String")]
    pub wing: Wing,

    /// 1-based ordinal of the household within its wing
    pub house_number: i64,

    #[sqlx(try_from = "String")]
    pub subscription_tier: SubscriptionTier,

    /// Price paid for the current subscription period
    pub subscription_cost: f64,

    /// Start of the current paid period (NULL while on Silver)
    pub subscription_start_date: Option<NaiveDate>,

    /// End of the current paid period (NULL while on Silver)
    pub subscription_valid_until: Option<NaiveDate>,

    /// Number of registered vehicles with `owner_type = Resident`
    pub vehicle_count: i64,

    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,
}

impl Resident {
    /// Build the row for a newly admitted resident.
    ///
    /// Starts on Silver at no cost, with no subscription dates and no
    /// vehicles.
    pub fn admitted(
        serial: i64,
        first_name: &str,
        last_name: &str,
        contact_number: &str,
        wing: Wing,
        house_number: i64,
    ) -> Self {
        use aptpark_core::credentials;

        Self {
            resident_id: credentials::resident_id(serial),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            contact_number: contact_number.to_string(),
            wing,
            house_number,
            subscription_tier: SubscriptionTier::Silver,
            subscription_cost: 0.0,
            subscription_start_date: None,
            subscription_valid_until: None,
            vehicle_count: 0,
            username: credentials::username(first_name, house_number),
            password: credentials::password(contact_number, wing, house_number),
        }
    }

    /// Recompute username and password after a name or contact change.
    pub fn refresh_credentials(&mut self) {
        use aptpark_core::credentials;

        self.username = credentials::username(&self.first_name, self.house_number);
        self.password = credentials::password(&self.contact_number, self.wing, self.house_number);
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Vehicle registration limits of the current tier
    pub fn caps(&self) -> VehicleCaps {
        self.subscription_tier.caps()
    }

    /// Verify a login attempt in constant time
    pub fn verify_password(&self, candidate: &str) -> bool {
        credentials_match(&self.password, candidate)
    }
}
