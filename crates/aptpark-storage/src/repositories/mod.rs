//! Typed queries, one module per table family.
//!
//! Every function takes `conn: &mut SqliteConnection`. Pass `&mut tx` for an
//! open [`Tx`](crate::Tx) or `&mut pooled` for a connection acquired from
//! [`Database::pool`](crate::Database::pool).

pub mod admin;
pub mod history;
pub mod parking;
pub mod residents;
pub mod vehicles;
pub mod waitlist;

pub use history::HistoryFilter;
pub use parking::ParkedFilter;
