use aptpark_core::VehicleType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Guest vehicle waiting for a spare slot (`guest_waiting_list` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WaitlistEntry {
    /// Allocated by the database on insert
    pub waitlist_id: i64,

    /// Host resident
    pub resident_id: String,

    pub vehicle_number: String,

    pub vehicle_brand: String,

    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,

    /// Arrival time, defines FIFO order
    pub time_added: NaiveDateTime,
}

/// Guest vehicle details captured before it joins the waiting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    pub resident_id: String,
    pub vehicle_number: String,
    pub vehicle_brand: String,
    pub vehicle_type: VehicleType,
}
