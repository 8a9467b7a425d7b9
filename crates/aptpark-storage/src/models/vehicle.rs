use aptpark_core::{OwnerType, ParkingArea, VehicleType};
use serde::{Deserialize, Serialize};

/// Registered vehicle (`vehicle` table)
///
/// Resident-owned vehicles are permanent and count toward the owner's
/// subscription caps. Guest vehicles are registered under the host
/// resident's id for the length of one spare-slot session and deleted when
/// the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    /// Registration plate, globally unique (`GJ01AB1234`)
    pub vehicle_number: String,

    /// Owning (or hosting) resident
    pub resident_id: String,

    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,

    pub vehicle_brand: String,

    #[sqlx(try_from = "String")]
    pub owner_type: OwnerType,
}

impl Vehicle {
    /// A permanent vehicle of `resident_id`.
    pub fn resident_owned(
        vehicle_number: &str,
        resident_id: &str,
        vehicle_type: VehicleType,
        vehicle_brand: &str,
    ) -> Self {
        Self {
            vehicle_number: vehicle_number.to_string(),
            resident_id: resident_id.to_string(),
            vehicle_type,
            vehicle_brand: vehicle_brand.to_string(),
            owner_type: OwnerType::Resident,
        }
    }

    /// A single-session guest vehicle hosted by `resident_id`.
    pub fn guest(
        vehicle_number: &str,
        resident_id: &str,
        vehicle_type: VehicleType,
        vehicle_brand: &str,
    ) -> Self {
        Self {
            owner_type: OwnerType::Guest,
            ..Self::resident_owned(vehicle_number, resident_id, vehicle_type, vehicle_brand)
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.owner_type, OwnerType::Guest)
    }
}

/// A resident's vehicle together with where it is parked right now.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleStatus {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,

    /// Slot from either active parking table, NULL when not parked
    pub parked_slot: Option<i64>,
}

impl VehicleStatus {
    pub fn is_parked(&self) -> bool {
        self.parked_slot.is_some()
    }

    /// `Resident Parking`, `Guest Parking` or `-`
    pub fn location(&self) -> &'static str {
        self.parked_slot
            .and_then(ParkingArea::for_slot)
            .map_or("-", ParkingArea::location)
    }
}

/// Vehicle lookup result with the owner's display name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleWithOwner {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,

    /// "First Last" of the owning resident
    pub owner_name: String,
}
