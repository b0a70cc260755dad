//! # Ember Common
//!
//! Common types, utilities, and shared abstractions for the Ember engine core.
//!
//! This crate provides foundational types used across all Ember subsystems:
//! - Error types shared by the pixel, asset, and particle cores
//! - Floating-point RGBA colour
//! - Axis-aligned bounding boxes
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod aabb;
pub mod color;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aabb::*;
    pub use crate::color::*;
    pub use crate::error::*;
}

pub use prelude::*;
