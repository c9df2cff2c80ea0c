//! # Packrat Core
//!
//! Shared result and error model for the Packrat workspace.
//!
//! Every fallible operation in the workspace returns [`Result`], carrying
//! either a value or a [`SimpleError`] descriptor. Descriptors are plain,
//! fully serializable data so a failure survives crossing a boundary that
//! strips exception identity (task joins, RPC relays, log pipelines).
//!
//! ## Usage
//!
//! ```rust
//! use packrat_core::{Result, SimpleError};
//!
//! fn parse_limit(raw: &str) -> Result<u32> {
//!     raw.parse().map_err(|e: std::num::ParseIntError| {
//!         SimpleError::new("LimitInvalid", "limit must be an integer")
//!             .with_cause(SimpleError::from_error(&e))
//!     })
//! }
//! ```

pub mod error;

// Re-export commonly used types at crate root for convenience
pub use error::{JsonObject, Result, SimpleError, BUG_ERROR_NAME, DEFAULT_ERROR_NAME};
