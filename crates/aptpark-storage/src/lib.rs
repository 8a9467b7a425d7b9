//! Storage layer for the AptPark apartment parking manager.
//!
//! This crate provides SQLite-backed persistence for residents, vehicles,
//! active parking slots, parking history and the guest waiting list.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool manager with embedded migrations
//! - [`transaction`] - Begin/commit/rollback/end scoping used by every
//!   mutating service operation
//! - [`repositories`] - One module of typed queries per table family
//! - [`models`] - Row types decoded with `sqlx::FromRow`
//!
//! # Repository Functions
//!
//! Repositories own SQL, not state. Every function takes a
//! `&mut SqliteConnection`, so the same call works on a pooled connection
//! and inside a transaction:
//!
//! ```no_run
//! use aptpark_storage::{Database, transaction};
//! use aptpark_storage::repositories::{parking, residents};
//! use aptpark_core::Wing;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//!
//! let mut tx = transaction::begin(&db).await?;
//! let residents_in_a = residents::count_in_wing(&mut tx, Wing::A).await?;
//! let parked_in_a = parking::occupied_in_wing(&mut tx, Wing::A).await?;
//! transaction::end(tx).await;
//!
//! println!("Wing A: {residents_in_a} residents, {parked_in_a} parked");
//! # Ok(())
//! # }
//! ```
//!
//! # Schema-owned rules
//!
//! - `ON DELETE CASCADE` from residents to vehicles and from vehicles to
//!   both active parking tables
//! - `CHECK` constraints pin slot numbers to their range
//! - Triggers keep a vehicle in at most one active table, compute
//!   `total_hours` and `charge_amount` of history rows and reject updates
//!   or deletes of history
//!
//! # Security Considerations
//!
//! Passwords are compared in constant time via the `subtle` crate, and all
//! queries use bound parameters.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod transaction;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{
    ActiveParking, Admin, HistoryEntry, NewParkingRecord, NewWaitlistEntry, ParkedSlot,
    ParkedVehicleView, ParkingRecord, Resident, Vehicle, VehicleStatus, VehicleWithOwner,
    WaitlistEntry,
};
pub use transaction::Tx;
