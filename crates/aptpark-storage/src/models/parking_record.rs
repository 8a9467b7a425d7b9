use aptpark_core::{ParkingArea, VehicleType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Completed parking session (`parking_records` table)
///
/// History rows are insert-only. `total_hours` and `charge_amount` are
/// computed by the schema when the row is inserted and are read back, never
/// calculated by the application.
///
/// # Fields
///
/// * `time_in` - Original arrival time, NULL for sessions closed by deleting
///   a parked vehicle
/// * `time_out` - When the slot was released
/// * `total_hours` - `time_out - time_in` in hours, rounded to two decimals
/// * `charge_amount` - Non-negative amount due for the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParkingRecord {
    pub record_id: i64,

    #[sqlx(rename = "Slot_id")]
    pub slot_id: i64,

    pub vehicle_number: String,

    pub resident_id: Option<String>,

    pub vehicle_brand: String,

    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,

    pub time_in: Option<NaiveDateTime>,

    pub time_out: NaiveDateTime,

    pub total_hours: f64,

    pub charge_amount: f64,
}

impl ParkingRecord {
    /// Domain of the released slot.
    pub fn parking_type(&self) -> ParkingArea {
        ParkingArea::for_slot(self.slot_id).unwrap_or(ParkingArea::Resident)
    }
}

/// Values the application supplies when archiving a session.
///
/// `time_out` is always the database's current time.
#[derive(Debug, Clone)]
pub struct NewParkingRecord {
    pub slot_id: i64,
    pub vehicle_number: String,
    pub resident_id: Option<String>,
    pub vehicle_brand: String,
    pub vehicle_type: VehicleType,
    pub time_in: Option<NaiveDateTime>,
}

/// History row joined with the owner's name for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    #[sqlx(flatten)]
    pub record: ParkingRecord,

    /// NULL when the resident has since been deleted
    pub owner_name: Option<String>,
}

impl HistoryEntry {
    /// Owner name, or `N/A` for residents that no longer exist.
    pub fn owner_display(&self) -> &str {
        self.owner_name.as_deref().unwrap_or("N/A")
    }
}
