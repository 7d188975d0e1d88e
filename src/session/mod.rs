//! Poster composition.

pub mod compose;
