//! Foundation types for clicker.
//!
//! Platform-agnostic values shared by every clicker crate: the error enum,
//! input values exchanged with the device boundary, and the startup
//! configuration file.

pub mod config;
pub mod error;
pub mod input;
