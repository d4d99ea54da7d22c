//! Terminal playback for gifascii.
//!
//! Provides the player state machine, interruptible waits, the terminal
//! session guard and playback-rate measurement.

pub mod cancel;
pub mod fps;
pub mod player;
pub mod terminal;

pub use cancel::{CancelSignal, FlagCancel, KeyCancel};
pub use player::{PlaybackReport, Player, PlayerState};
pub use terminal::TerminalSession;
