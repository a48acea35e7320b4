//! # Glimpse Protocols
//!
//! Capability traits and shared data types for the Glimpse snapshot engine.
//! Contains only interface definitions and plain data - no browser backends.
//!
//! ## Core Traits
//!
//! - [`PageDriver`] - narrow interface over a live rendered document
//!
//! Backends (CDP, in-memory fixtures) implement [`PageDriver`]; the engine in
//! `glimpse-core` only ever talks to a page through it.

pub mod driver;
pub mod error;
pub mod types;

pub use driver::PageDriver;
pub use error::DriverError;
pub use types::*;
