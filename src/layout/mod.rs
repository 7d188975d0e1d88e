//! Anchor-relative placement on the canvas.

pub mod position;
