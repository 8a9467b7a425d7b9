//! Compiled-in domain constants.
//!
//! Capacities, slot ranges and subscription pricing are not configurable at
//! runtime. The database schema carries matching `CHECK` constraints for the
//! slot ranges, so changing a range here requires a migration as well.
//!
//! # Slot numbering
//!
//! | Range | Domain | Capacity |
//! |-------|--------|----------|
//! | 1..=1200 | Resident parking (wings A/B/C share the pool) | 400 per wing |
//! | 1201..=1350 | Spare (guest) parking | 150 |
//!
//! A slot number identifies its domain by range alone.

// ============================================================================
// Tenancy
// ============================================================================

/// Maximum number of residents in the whole complex.
pub const MAX_RESIDENTS: i64 = 150;

/// Maximum number of residents in a single wing.
pub const MAX_RESIDENTS_PER_WING: i64 = 50;

/// Prefix of every resident identifier (`RES001`, `RES002`, ...).
pub const RESIDENT_ID_PREFIX: &str = "RES";

// ============================================================================
// Parking
// ============================================================================

/// First resident slot.
pub const RESIDENT_SLOT_MIN: i64 = 1;

/// Last resident slot.
pub const RESIDENT_SLOT_MAX: i64 = 1200;

/// Resident slots that vehicles of one wing may occupy at the same time.
pub const WING_PARKING_CAPACITY: i64 = 400;

/// First spare (guest) slot.
pub const SPARE_SLOT_MIN: i64 = 1201;

/// Last spare (guest) slot.
pub const SPARE_SLOT_MAX: i64 = 1350;

/// Number of spare slots.
pub const SPARE_PARKING_CAPACITY: i64 = SPARE_SLOT_MAX - SPARE_SLOT_MIN + 1;

/// Slot number an operator types to abandon slot selection.
pub const CANCEL_SLOT: i64 = 0;

// ============================================================================
// Subscription
// ============================================================================

/// Length of a paid subscription period in calendar months.
pub const SUBSCRIPTION_MONTHS: u32 = 6;

/// Price of a Gold subscription period.
pub const GOLD_PRICE: f64 = 1800.00;

/// Price of a Platinum subscription period.
pub const PLATINUM_PRICE: f64 = 3000.00;

// ============================================================================
// Guest waiting list
// ============================================================================

/// Default number of guest vehicles held by the waiting list.
pub const DEFAULT_WAITLIST_CAPACITY: usize = 50;

// ============================================================================
// Input formats
// ============================================================================

/// Digits in a contact number.
pub const CONTACT_LENGTH: usize = 10;

/// Characters in a registration plate (`GJ01AB1234`).
pub const VEHICLE_NUMBER_LENGTH: usize = 10;

/// Minimum administrator password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum number of digits in an administrator password.
pub const MIN_PASSWORD_DIGITS: usize = 2;
