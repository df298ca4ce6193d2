//! Business logic services for the API.
//!
//! # Services
//!
//! - `auth` - Bearer token issuing and verification

pub mod auth;
