//! Use cases of the AptPark apartment parking manager.
//!
//! Each service owns a clone of the [`Database`](aptpark_storage::Database)
//! handle and exposes two layers:
//!
//! - Interactive operations (`add_resident`, `park_guest_vehicle`, ...) that
//!   prompt through a [`Console`](console::Console), run inside exactly one
//!   transaction and report through the console.
//! - Non-interactive cores (`admit`, `register`, `park_in_slot`, `release`,
//!   ...) taking a `&mut SqliteConnection`, used by the interactive layer and
//!   directly by tests.
//!
//! # Outcomes
//!
//! Business rules that say "no" are values, not errors:
//!
//! ```
//! use aptpark_services::{Outcome, Rejection};
//!
//! let outcome: Outcome<()> = Rejection::GuestParkingFull.into();
//! assert_eq!(outcome.rejection(), Some(&Rejection::GuestParkingFull));
//! ```
//!
//! A committed operation returns `Done`, a rejection or cancellation rolls
//! back whatever the transaction held, and a [`ServiceError`] means storage
//! or console I/O failed.

pub mod auth;
pub mod console;
pub mod error;
pub mod messages;
pub mod parking;
pub mod prompt;
pub mod report;
pub mod table;
pub mod tenancy;
pub mod vehicles;
pub mod views;
pub mod waitlist;

mod unit_of_work;

pub use auth::AuthService;
pub use error::{Outcome, Rejection, ServiceError, ServiceResult};
pub use parking::ParkingService;
pub use tenancy::TenancyService;
pub use vehicles::{Actor, VehicleService};
pub use waitlist::GuestWaitList;
