//! # Ember Pixel
//!
//! Pixel format descriptors and image conversion for the Ember engine core.
//!
//! This crate provides:
//! - A read-only descriptor table covering every supported pixel layout
//!   (integer, float, block-compressed, depth)
//! - Packing and unpacking of single pixels through a float RGBA intermediate
//! - Bulk region conversion with fast paths for the common 32-bit swizzles
//! - In-place vertical flip and per-texel colour access
//!
//! The descriptor table is static data; every query here is a pure function.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod convert;
pub mod descriptor;
pub mod format;
pub mod half;
pub mod packing;
pub mod pixel_box;

pub use convert::{convert, set_colour_at, colour_at, vertical_flip};
pub use descriptor::{ComponentType, FormatDescriptor, FormatFlags};
pub use format::PixelFormat;
pub use packing::{pack, unpack};
pub use pixel_box::{PixelBox, PixelBoxMut, Region};
