use crate::{
    Result,
    constants::{
        GOLD_PRICE, PLATINUM_PRICE, RESIDENT_SLOT_MAX, RESIDENT_SLOT_MIN, SPARE_PARKING_CAPACITY,
        SPARE_SLOT_MAX, SPARE_SLOT_MIN, WING_PARKING_CAPACITY,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Physical sub-building of the complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wing {
    A,
    B,
    C,
}

impl Wing {
    /// All wings in display order.
    pub const ALL: [Wing; 3] = [Wing::A, Wing::B, Wing::C];

    /// Column value stored in `residents.wing`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Wing::A => "A",
            Wing::B => "B",
            Wing::C => "C",
        }
    }
}

impl fmt::Display for Wing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `a`/`A` style input with surrounding whitespace.
impl FromStr for Wing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Wing::A),
            "B" => Ok(Wing::B),
            "C" => Ok(Wing::C),
            _ => Err(Error::InvalidWing(s.to_string())),
        }
    }
}

impl TryFrom<String> for Wing {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Registration limits granted by a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCaps {
    pub four_wheelers: i64,
    pub two_wheelers: i64,
}

impl VehicleCaps {
    /// Cap for one vehicle type.
    #[must_use]
    pub fn for_type(&self, vehicle_type: VehicleType) -> i64 {
        match vehicle_type {
            VehicleType::FourWheeler => self.four_wheelers,
            VehicleType::TwoWheeler => self.two_wheelers,
        }
    }
}

/// Membership level capping how many non-guest vehicles a household registers.
///
/// | Tier | Price (6 months) | 4-wheelers | 2-wheelers |
/// |------|-----------------:|-----------:|-----------:|
/// | Silver | 0 | 1 | 2 |
/// | Gold | 1800.00 | 2 | 3 |
/// | Platinum | 3000.00 | 3 | 5 |
///
/// Variants are declared in ascending order so `Ord` ranks tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubscriptionTier {
    Silver,
    Gold,
    Platinum,
}

impl SubscriptionTier {
    /// Tiers a resident can buy.
    pub const PAID: [SubscriptionTier; 2] = [SubscriptionTier::Gold, SubscriptionTier::Platinum];

    /// Column value stored in `residents.subscription_tier`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Silver => "Silver",
            SubscriptionTier::Gold => "Gold",
            SubscriptionTier::Platinum => "Platinum",
        }
    }

    /// Price of one subscription period.
    #[must_use]
    pub fn price(self) -> f64 {
        match self {
            SubscriptionTier::Silver => 0.0,
            SubscriptionTier::Gold => GOLD_PRICE,
            SubscriptionTier::Platinum => PLATINUM_PRICE,
        }
    }

    #[must_use]
    pub fn caps(self) -> VehicleCaps {
        match self {
            SubscriptionTier::Silver => VehicleCaps {
                four_wheelers: 1,
                two_wheelers: 2,
            },
            SubscriptionTier::Gold => VehicleCaps {
                four_wheelers: 2,
                two_wheelers: 3,
            },
            SubscriptionTier::Platinum => VehicleCaps {
                four_wheelers: 3,
                two_wheelers: 5,
            },
        }
    }

    /// Returns `true` when no higher tier exists.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(self, SubscriptionTier::Platinum)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Silver" => Ok(SubscriptionTier::Silver),
            "Gold" => Ok(SubscriptionTier::Gold),
            "Platinum" => Ok(SubscriptionTier::Platinum),
            _ => Err(Error::InvalidTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for SubscriptionTier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Vehicle class used for subscription caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    FourWheeler,
    TwoWheeler,
}

impl VehicleType {
    /// Column value stored in `vehicle.vehicle_type`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::FourWheeler => "4-wheeler",
            VehicleType::TwoWheeler => "2-wheeler",
        }
    }

    /// Map the console menu choice (1 = 4-wheeler, 2 = 2-wheeler).
    #[must_use]
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(VehicleType::FourWheeler),
            2 => Some(VehicleType::TwoWheeler),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "4-wheeler" => Ok(VehicleType::FourWheeler),
            "2-wheeler" => Ok(VehicleType::TwoWheeler),
            _ => Err(Error::InvalidVehicleType(s.to_string())),
        }
    }
}

impl TryFrom<String> for VehicleType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Registration class of a vehicle.
///
/// Resident vehicles are permanent and count toward subscription caps. Guest
/// vehicles exist for a single parking session and are deleted on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    Resident,
    Guest,
}

impl OwnerType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerType::Resident => "Resident",
            OwnerType::Guest => "Guest",
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Resident" => Ok(OwnerType::Resident),
            "Guest" => Ok(OwnerType::Guest),
            _ => Err(Error::InvalidOwnerType(s.to_string())),
        }
    }
}

impl TryFrom<String> for OwnerType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Parking domain a slot belongs to, identified by the slot number's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkingArea {
    /// Main lot, slots 1..=1200
    Resident,
    /// Overflow lot for guests, slots 1201..=1350
    Guest,
}

impl ParkingArea {
    /// Classify a slot number, `None` when it lies outside both ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use aptpark_core::ParkingArea;
    ///
    /// assert_eq!(ParkingArea::for_slot(5), Some(ParkingArea::Resident));
    /// assert_eq!(ParkingArea::for_slot(1201), Some(ParkingArea::Guest));
    /// assert_eq!(ParkingArea::for_slot(0), None);
    /// ```
    #[must_use]
    pub fn for_slot(slot: i64) -> Option<Self> {
        if ParkingArea::Resident.slots().contains(&slot) {
            Some(ParkingArea::Resident)
        } else if ParkingArea::Guest.slots().contains(&slot) {
            Some(ParkingArea::Guest)
        } else {
            None
        }
    }

    #[must_use]
    pub fn slots(self) -> RangeInclusive<i64> {
        match self {
            ParkingArea::Resident => RESIDENT_SLOT_MIN..=RESIDENT_SLOT_MAX,
            ParkingArea::Guest => SPARE_SLOT_MIN..=SPARE_SLOT_MAX,
        }
    }

    /// Occupancy limit: per wing for resident parking, total for guest parking.
    #[must_use]
    pub fn capacity(self) -> i64 {
        match self {
            ParkingArea::Resident => WING_PARKING_CAPACITY,
            ParkingArea::Guest => SPARE_PARKING_CAPACITY,
        }
    }

    /// Short label used in history tables ("Park Type").
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ParkingArea::Resident => "Resident",
            ParkingArea::Guest => "Guest",
        }
    }

    /// Location label used in vehicle listings.
    #[must_use]
    pub fn location(self) -> &'static str {
        match self {
            ParkingArea::Resident => "Resident Parking",
            ParkingArea::Guest => "Guest Parking",
        }
    }
}

impl fmt::Display for ParkingArea {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Occupancy state of a single slot.
///
/// ```text
/// FREE ──park──► OCCUPIED ──remove──► FREE (+ history row)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Free,
    Occupied,
}

impl SlotState {
    #[must_use]
    pub fn is_free(self) -> bool {
        matches!(self, SlotState::Free)
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SlotState::Free => write!(f, "Free"),
            SlotState::Occupied => write!(f, "Occupied"),
        }
    }
}
