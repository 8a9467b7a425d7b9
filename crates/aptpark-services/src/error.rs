use aptpark_core::{SubscriptionTier, VehicleType, Wing};
use aptpark_storage::StorageError;
use thiserror::Error;

/// Failures that abort an operation and roll back its transaction.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Invalid(#[from] aptpark_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input closed")]
    InputClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Business rule that stopped an operation before it wrote anything.
///
/// The `Display` text is what the operator sees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Apartment is full. No more residents can be added (maximum 150).")]
    ApartmentFull,

    #[error("Wing {0} is full. No more residents can be added to this wing (maximum 50).")]
    WingFull(Wing),

    #[error("Contact number {0} is already registered to another resident.")]
    ContactInUse(String),

    #[error("Username {0} is already taken by another resident.")]
    UsernameTaken(String),

    #[error("Resident {0} not found.")]
    ResidentNotFound(String),

    #[error("Vehicle {0} not found.")]
    VehicleNotFound(String),

    #[error("Vehicle {0} is already registered.")]
    VehicleAlreadyRegistered(String),

    #[error("Vehicle {0} does not belong to this resident.")]
    NotOwner(String),

    #[error(
        "Vehicle limit reached: {tier} allows {cap} {vehicle_type} vehicle(s). Upgrade your subscription to add more."
    )]
    VehicleCapReached {
        tier: SubscriptionTier,
        vehicle_type: VehicleType,
        cap: i64,
    },

    #[error("Already on the highest tier (Platinum).")]
    AlreadyTopTier,

    #[error("Already subscribed to {0}.")]
    AlreadyOnTier(SubscriptionTier),

    #[error("Downgrading from {from} to {to} is not offered.")]
    DowngradeNotOffered {
        from: SubscriptionTier,
        to: SubscriptionTier,
    },

    #[error("Wing {0} resident parking is full (400 vehicles).")]
    WingParkingFull(Wing),

    #[error("Guest parking is full.")]
    GuestParkingFull,

    #[error("No vehicles available to park.")]
    NoVehiclesToPark,

    #[error("No vehicles are currently parked.")]
    NothingParked,

    #[error("Vehicle {0} is already parked.")]
    VehicleAlreadyParked(String),

    #[error("Vehicle {0} is not parked.")]
    VehicleNotParked(String),

    #[error("Slot {slot} is outside the {area} parking range.")]
    SlotOutOfRange {
        slot: i64,
        area: aptpark_core::ParkingArea,
    },

    #[error("Slot {0} is already occupied.")]
    SlotOccupied(i64),

    #[error("Waiting list is full.")]
    WaitlistFull,

    #[error("Vehicle {0} is already on the waiting list.")]
    AlreadyWaiting(String),

    #[error("Waiting list is empty.")]
    WaitlistEmpty,
}

/// Result of an operation that can stop for ordinary reasons.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Committed
    Done(T),
    /// A business rule said no; nothing was written
    Rejected(Rejection),
    /// The operator backed out; nothing was written
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    /// The committed value, if any
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(value) => Outcome::Done(f(value)),
            Outcome::Rejected(rejection) => Outcome::Rejected(rejection),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

impl<T> From<Rejection> for Outcome<T> {
    fn from(rejection: Rejection) -> Self {
        Outcome::Rejected(rejection)
    }
}
