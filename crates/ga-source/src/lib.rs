//! Visual source modules for gifascii: animated image decoding and GIF discovery.

pub mod gif;
pub mod picker;

pub use gif::{decode_animation, decode_gif};
