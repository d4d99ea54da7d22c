//! ASCII conversion engine for gifascii.
//!
//! Resamples decoded frames to character grids and maps luminance to glyphs,
//! one frame at a time or across a worker pool.

pub mod converter;
pub mod rasterizer;
pub mod resample;

pub use converter::{ExecutionMode, SequenceConverter, convert_animation};
pub use rasterizer::{Rasterizer, target_size};
