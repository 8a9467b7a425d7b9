//! Domain vocabulary for the AptPark apartment parking manager.
//!
//! This crate holds everything that does not need a database: capacity and
//! pricing constants, the domain enums stored in the relational schema,
//! credential derivation rules for new residents and the stateless input
//! validators used by the console.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
