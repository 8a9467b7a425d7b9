//! Console messages shown to the operator
//!
//! Outcome texts for business-rule rejections live on
//! [`Rejection`](crate::error::Rejection); this module holds the prompts'
//! re-prompt texts and the success and cancellation notices.
//!
//! # Usage
//!
//! ```
//! use aptpark_services::messages::DisplayMessages;
//!
//! println!("{}", DisplayMessages::OPERATION_CANCELLED);
//! ```

/// Operator-facing console messages
///
/// # Extending Messages
///
/// Add the constant here and to `test_messages_are_non_empty()`.
pub struct DisplayMessages;

impl DisplayMessages {
    /// Operator answered "n" at a confirmation or chose slot 0
    pub const OPERATION_CANCELLED: &'static str = "Operation cancelled.";

    /// Any storage failure after rollback
    pub const OPERATION_FAILED: &'static str = "Operation failed; no changes were saved.";

    pub const INVALID_YES_NO: &'static str = "Please enter 'y' or 'n'.";

    pub const INVALID_NUMBER: &'static str = "Please enter a valid number.";

    pub const INVALID_CHOICE: &'static str = "Invalid choice. Please try again.";

    pub const INVALID_CONTACT: &'static str =
        "Invalid contact number. Enter 10 digits starting with 6, 7, 8 or 9.";

    pub const INVALID_WING: &'static str = "Invalid wing. Enter A, B or C.";

    pub const INVALID_VEHICLE_NUMBER: &'static str =
        "Invalid vehicle number. Use the format XX00XX0000 (e.g. GJ01AB1234).";

    pub const WEAK_PASSWORD: &'static str = "Password must be at least 8 characters with 1 uppercase letter, 2 digits and 1 special character.";

    pub const EMPTY_FIELD: &'static str = "This field cannot be empty.";

    pub const CONTACT_IN_USE: &'static str = "This contact number is already registered.";

    pub const VEHICLE_EXISTS: &'static str = "This vehicle number is already registered.";

    pub const SLOT_OCCUPIED: &'static str = "That slot is already occupied. Choose another.";

    /// Successful resident admission, followed by the credentials
    pub const RESIDENT_ADDED: &'static str = "Resident added successfully.";

    pub const RESIDENT_UPDATED: &'static str = "Resident details updated successfully.";

    pub const RESIDENT_DELETED: &'static str = "Resident deleted successfully.";

    pub const SUBSCRIPTION_UPGRADED: &'static str = "Subscription upgraded successfully.";

    pub const VEHICLE_DELETED: &'static str = "Vehicle deleted successfully.";

    pub const GUEST_WAITLISTED: &'static str = "Guest vehicle added to the waiting list.";

    pub const LOGIN_FAILED: &'static str = "Invalid credentials.";

    pub const CREDENTIALS_CHANGED: &'static str =
        "Credentials updated. Please log in again with the new credentials.";

    pub const NO_RECORDS: &'static str = "No records found.";
}
