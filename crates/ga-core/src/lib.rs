//! Configuration, types, and shared structures for gifascii.
//!
//! This crate contains the palette and glyph mapper, the pixel and glyph
//! types, the frame store format and the configuration shared across the
//! workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod store;

pub use charset::{GlyphLut, Palette};
pub use config::{AppConfig, ConvertConfig, PlaybackConfig, Resampling};
pub use error::CoreError;
pub use frame::{DecodedAnimation, DecodedFrame, FrameBuffer, FrameSequence, GlyphGrid, PixelLayout};
