//! Sweet Home Core - Shared types library.
//!
//! This crate provides common types used across all Sweet Home components:
//! - `api` - Address service and analytics collector
//! - `tracker` - Client behavior tracker
//! - `cli` - Command-line tools for migrations and development
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, address records and tracking records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
