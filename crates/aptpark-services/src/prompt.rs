//! Re-prompting readers built on [`Console`].
//!
//! Every reader loops until the input is valid, printing a hint after each
//! bad line. Only end of input stops a loop, as [`ServiceError::InputClosed`].

use crate::console::Console;
use crate::error::{ServiceError, ServiceResult};
use crate::messages::DisplayMessages;
use aptpark_core::{VehicleType, Wing, credentials, validation};
use std::ops::RangeInclusive;

/// One trimmed line.
pub fn text(console: &mut impl Console, prompt: &str) -> ServiceResult<String> {
    console
        .read_line(prompt)
        .map(|line| line.trim().to_string())
        .ok_or(ServiceError::InputClosed)
}

pub fn non_empty(console: &mut impl Console, prompt: &str, field: &str) -> ServiceResult<String> {
    loop {
        match validation::non_empty(field, &text(console, prompt)?) {
            Ok(value) => return Ok(value),
            Err(e) => console.say(&e.to_string()),
        }
    }
}

pub fn integer(console: &mut impl Console, prompt: &str) -> ServiceResult<i64> {
    loop {
        match text(console, prompt)?.parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => console.say(DisplayMessages::INVALID_NUMBER),
        }
    }
}

/// A number inside `range`.
pub fn choice(
    console: &mut impl Console,
    prompt: &str,
    range: RangeInclusive<i64>,
) -> ServiceResult<i64> {
    loop {
        let value = integer(console, prompt)?;
        if range.contains(&value) {
            return Ok(value);
        }
        console.say(DisplayMessages::INVALID_CHOICE);
    }
}

/// `y`/`yes` or `n`/`no`, any case.
pub fn yes_no(console: &mut impl Console, prompt: &str) -> ServiceResult<bool> {
    loop {
        match text(console, prompt)?.to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => console.say(DisplayMessages::INVALID_YES_NO),
        }
    }
}

/// Well-formed contact number. Uniqueness is the caller's check.
pub fn contact(console: &mut impl Console, prompt: &str) -> ServiceResult<String> {
    loop {
        match validation::contact_number(&text(console, prompt)?) {
            Ok(value) => return Ok(value),
            Err(_) => console.say(DisplayMessages::INVALID_CONTACT),
        }
    }
}

pub fn wing(console: &mut impl Console, prompt: &str) -> ServiceResult<Wing> {
    loop {
        match text(console, prompt)?.parse::<Wing>() {
            Ok(wing) => return Ok(wing),
            Err(_) => console.say(DisplayMessages::INVALID_WING),
        }
    }
}

/// A typed resident id in canonical form (`res7` becomes `RES007`).
pub fn resident_id(console: &mut impl Console) -> ServiceResult<String> {
    let typed = non_empty(console, "Enter Resident ID: ", "Resident ID")?;
    Ok(credentials::normalize_resident_id(&typed))
}

/// Well-formed, upper-cased registration number.
pub fn vehicle_number(console: &mut impl Console, prompt: &str) -> ServiceResult<String> {
    loop {
        match validation::vehicle_number(&text(console, prompt)?) {
            Ok(value) => return Ok(value),
            Err(_) => console.say(DisplayMessages::INVALID_VEHICLE_NUMBER),
        }
    }
}

pub fn vehicle_type(console: &mut impl Console) -> ServiceResult<VehicleType> {
    console.say("Select vehicle type:");
    console.say("1. 4-wheeler");
    console.say("2. 2-wheeler");
    loop {
        let picked = choice(console, "Enter choice (1-2): ", 1..=2)?;
        if let Some(vehicle_type) = VehicleType::from_choice(picked) {
            return Ok(vehicle_type);
        }
    }
}

/// A password meeting the administrator policy.
pub fn password(console: &mut impl Console, prompt: &str) -> ServiceResult<String> {
    loop {
        let candidate = console.read_line(prompt).ok_or(ServiceError::InputClosed)?;
        match validation::password_policy(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(_) => console.say(DisplayMessages::WEAK_PASSWORD),
        }
    }
}

/// Edit prompt where an empty line keeps `current`.
pub fn keep_or(console: &mut impl Console, label: &str, current: &str) -> ServiceResult<String> {
    let value = text(console, &format!("{label} [{current}] (Enter to keep): "))?;
    Ok(if value.is_empty() {
        current.to_string()
    } else {
        value
    })
}
