//! Poster templates and their registry.

pub mod model;
pub mod registry;
