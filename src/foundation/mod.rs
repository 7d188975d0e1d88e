//! Errors, core geometry types and engine configuration.

pub mod config;
pub mod core;
pub mod error;
