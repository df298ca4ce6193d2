//! Sweet Home API library.
//!
//! This crate provides the address service and analytics collector as a
//! library, allowing the router to be tested in-process and the token
//! service to be reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
