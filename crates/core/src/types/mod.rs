//! Core types for Sweet Home.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod tracking;

pub use address::{Address, AddressPatch, NewAddress};
pub use id::*;
pub use tracking::{
    ClickDetails, ElementDescriptor, FormSubmitDetails, InteractionRecord, InteractionType,
    SearchDetails, SessionRecord,
};
