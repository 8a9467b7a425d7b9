use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Domain value errors
    #[error("Invalid wing: {0} (expected A, B or C)")]
    InvalidWing(String),

    #[error("Invalid subscription tier: {0}")]
    InvalidTier(String),

    #[error("Invalid vehicle type: {0}")]
    InvalidVehicleType(String),

    #[error("Invalid owner type: {0}")]
    InvalidOwnerType(String),

    #[error("Invalid resident ID: {0}")]
    InvalidResidentId(String),

    // Input format errors
    #[error("Invalid contact number: {0} (10 digits starting with 6-9)")]
    InvalidContact(String),

    #[error("Invalid vehicle number: {0} (format XX00XX0000)")]
    InvalidVehicleNumber(String),

    #[error("Password does not meet policy: {0}")]
    WeakPassword(String),

    #[error("{0} cannot be empty")]
    EmptyField(String),
}

pub type Result<T> = std::result::Result<T, Error>;
