//! Core grid types

pub mod types;

pub use types::{GridBounds, GridCoord, Heading};
