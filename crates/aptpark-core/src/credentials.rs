//! Deterministic identifiers and login credentials for new residents.
//!
//! A resident admitted as the `n`-th household of wing `W` receives:
//!
//! - `resident_id`: `RES` followed by the zero-padded serial (`RES001`)
//! - `username`: lower-cased first name followed by the house number (`amit1`)
//! - `password`: last four digits of the contact, `@`, the wing, `#`, the
//!   house number (`3210@A#1`)
//!
//! Username and password are recomputed with the same rules whenever the
//! resident's name or contact changes.

use crate::{Result, Wing, constants::RESIDENT_ID_PREFIX, error::Error};

/// Format a resident identifier from its numeric serial.
///
/// # Examples
///
/// ```
/// use aptpark_core::credentials::resident_id;
///
/// assert_eq!(resident_id(1), "RES001");
/// assert_eq!(resident_id(42), "RES042");
/// assert_eq!(resident_id(1000), "RES1000");
/// ```
#[must_use]
pub fn resident_id(serial: i64) -> String {
    format!("{RESIDENT_ID_PREFIX}{serial:03}")
}

/// Extract the numeric serial from a resident identifier.
///
/// # Errors
/// Returns `Error::InvalidResidentId` when the prefix is missing or the
/// remainder is not a number.
pub fn serial_of(resident_id: &str) -> Result<i64> {
    resident_id
        .strip_prefix(RESIDENT_ID_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| Error::InvalidResidentId(resident_id.to_string()))
}

/// Canonical form of a typed resident identifier.
///
/// Input is trimmed and upper-cased; a well-formed id is re-padded from its
/// serial. Anything else comes back upper-cased so the lookup simply misses.
///
/// # Examples
///
/// ```
/// use aptpark_core::credentials::normalize_resident_id;
///
/// assert_eq!(normalize_resident_id(" res7 "), "RES007");
/// assert_eq!(normalize_resident_id("RES001"), "RES001");
/// assert_eq!(normalize_resident_id("guest"), "GUEST");
/// ```
#[must_use]
pub fn normalize_resident_id(input: &str) -> String {
    let upper = input.trim().to_ascii_uppercase();
    match serial_of(&upper) {
        Ok(serial) => resident_id(serial),
        Err(_) => upper,
    }
}

/// Login name: lower-cased first name immediately followed by the house number.
#[must_use]
pub fn username(first_name: &str, house_number: i64) -> String {
    format!("{}{}", first_name.trim().to_lowercase(), house_number)
}

/// Initial password built from the contact number, wing and house number.
#[must_use]
pub fn password(contact_number: &str, wing: Wing, house_number: i64) -> String {
    let chars: Vec<char> = contact_number.chars().collect();
    let last4: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{last4}@{wing}#{house_number}")
}
