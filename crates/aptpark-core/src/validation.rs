//! Stateless validators for console input.
//!
//! Each validator trims its input, normalises case where the stored form is
//! upper-case, and returns the value ready to be persisted.

use crate::{
    Result,
    constants::{CONTACT_LENGTH, MIN_PASSWORD_DIGITS, MIN_PASSWORD_LENGTH, VEHICLE_NUMBER_LENGTH},
    error::Error,
};

/// Contact number: exactly ten digits, the first one 6 to 9.
///
/// # Examples
///
/// ```
/// use aptpark_core::validation::contact_number;
///
/// assert_eq!(contact_number(" 9876543210 ").unwrap(), "9876543210");
/// assert!(contact_number("5876543210").is_err());
/// ```
pub fn contact_number(input: &str) -> Result<String> {
    let value = input.trim();
    let bytes = value.as_bytes();
    let valid = bytes.len() == CONTACT_LENGTH
        && matches!(bytes[0], b'6'..=b'9')
        && bytes.iter().all(u8::is_ascii_digit);

    if valid {
        Ok(value.to_string())
    } else {
        Err(Error::InvalidContact(value.to_string()))
    }
}

/// Registration plate in the `XX00XX0000` layout, upper-cased.
///
/// # Examples
///
/// ```
/// use aptpark_core::validation::vehicle_number;
///
/// assert_eq!(vehicle_number("gj01ab1234").unwrap(), "GJ01AB1234");
/// assert!(vehicle_number("GJ1AB1234").is_err());
/// ```
pub fn vehicle_number(input: &str) -> Result<String> {
    let value = input.trim().to_ascii_uppercase();
    let bytes = value.as_bytes();
    let valid = bytes.len() == VEHICLE_NUMBER_LENGTH
        && bytes[0..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..6].iter().all(u8::is_ascii_uppercase)
        && bytes[6..10].iter().all(u8::is_ascii_digit);

    if valid {
        Ok(value)
    } else {
        Err(Error::InvalidVehicleNumber(input.trim().to_string()))
    }
}

/// Administrator password policy.
///
/// At least eight characters with one upper-case letter, two digits and one
/// character that is neither a letter nor a digit.
pub fn password_policy(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(Error::WeakPassword(
            "must contain an uppercase letter".to_string(),
        ));
    }
    if password.chars().filter(char::is_ascii_digit).count() < MIN_PASSWORD_DIGITS {
        return Err(Error::WeakPassword(format!(
            "must contain at least {MIN_PASSWORD_DIGITS} digits"
        )));
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(Error::WeakPassword(
            "must contain a special character".to_string(),
        ));
    }
    Ok(())
}

/// Trimmed, non-empty free text such as a name or a brand.
pub fn non_empty(field: &str, input: &str) -> Result<String> {
    let value = input.trim();
    if value.is_empty() {
        Err(Error::EmptyField(field.to_string()))
    } else {
        Ok(value.to_string())
    }
}
