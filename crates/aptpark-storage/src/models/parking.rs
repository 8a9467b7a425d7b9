use aptpark_core::{ParkingArea, VehicleType, Wing};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row of `parked_vehicle` or `spare_parked_vehicle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParkedSlot {
    #[sqlx(rename = "Slot_id")]
    pub slot_id: i64,

    pub vehicle_number: String,

    pub time_in: NaiveDateTime,
}

impl ParkedSlot {
    /// Domain of the slot; every stored slot lies in one of the two ranges.
    pub fn area(&self) -> ParkingArea {
        ParkingArea::for_slot(self.slot_id).unwrap_or(ParkingArea::Resident)
    }
}

/// One of a resident's active parking sessions, across both tables.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActiveParking {
    #[sqlx(rename = "Slot_id")]
    pub slot_id: i64,

    pub vehicle_number: String,

    pub vehicle_brand: String,

    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,

    pub time_in: NaiveDateTime,
}

impl ActiveParking {
    /// `Resident` for slots up to 1200, otherwise `Guest`.
    pub fn parking_type(&self) -> ParkingArea {
        ParkingArea::for_slot(self.slot_id).unwrap_or(ParkingArea::Resident)
    }
}

/// Parked vehicle listing row for the administrator views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParkedVehicleView {
    #[sqlx(rename = "Slot_id")]
    pub slot_id: i64,

    pub vehicle_number: String,

    pub vehicle_brand: String,

    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,

    pub resident_id: String,

    pub owner_name: String,

    #[sqlx(try_from = "String")]
    pub wing: Wing,

    pub time_in: NaiveDateTime,
}
