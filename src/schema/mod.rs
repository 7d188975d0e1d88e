//! Template validation.

pub mod validate;
