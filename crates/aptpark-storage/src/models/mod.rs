pub mod admin;
pub mod parking;
pub mod parking_record;
pub mod resident;
pub mod vehicle;
pub mod waitlist_entry;

pub use admin::Admin;
pub use parking::{ActiveParking, ParkedSlot, ParkedVehicleView};
pub use parking_record::{HistoryEntry, NewParkingRecord, ParkingRecord};
pub use resident::Resident;
pub use vehicle::{Vehicle, VehicleStatus, VehicleWithOwner};
pub use waitlist_entry::{NewWaitlistEntry, WaitlistEntry};

use subtle::ConstantTimeEq;

/// Byte-exact, constant-time comparison for stored credentials.
///
/// Case matters: `Admin@123` and `admin@123` are different passwords.
pub(crate) fn credentials_match(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}
