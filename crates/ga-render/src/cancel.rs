use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

/// Granularité de l'attente interruptible.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Source d'annulation consultée pendant l'attente entre deux frames.
///
/// # Example
/// ```
/// use ga_render::cancel::{CancelSignal, FlagCancel};
/// use std::time::Duration;
///
/// let mut cancel = FlagCancel::new();
/// assert!(!cancel.wait(Duration::from_millis(1)).unwrap());
/// cancel.cancel();
/// assert!(cancel.wait(Duration::from_secs(60)).unwrap());
/// ```
pub trait CancelSignal {
    /// Wait up to `timeout`, returning `true` as soon as cancellation is seen.
    ///
    /// # Errors
    /// Returns an error if the underlying event source fails.
    fn wait(&mut self, timeout: Duration) -> Result<bool>;
}

/// Time left before `deadline`; `None` (beyond `Instant` range) never expires.
fn remaining(deadline: Option<Instant>) -> Duration {
    deadline.map_or(Duration::MAX, |d| d.saturating_duration_since(Instant::now()))
}

/// Annulation par drapeau partagé, sondé toutes les `POLL_INTERVAL`.
#[derive(Clone, Debug, Default)]
pub struct FlagCancel {
    flag: Arc<AtomicBool>,
}

impl FlagCancel {
    /// Fresh, not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Shared flag, for other threads.
    #[must_use]
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl CancelSignal for FlagCancel {
    fn wait(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.flag.load(Ordering::Acquire) {
                return Ok(true);
            }
            let left = remaining(deadline);
            if left.is_zero() {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL.min(left));
        }
    }
}

/// Annulation au clavier : n'importe quelle touche pressée.
///
/// Requires raw mode (see `TerminalSession`) for key presses to arrive
/// without Enter.
#[derive(Debug, Default)]
pub struct KeyCancel;

impl CancelSignal for KeyCancel {
    fn wait(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            // Borné à POLL_INTERVAL : event::poll n'accepte pas Duration::MAX partout.
            let left = remaining(deadline);
            if event::poll(left.min(POLL_INTERVAL))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                // trace : stderr partage l'écran de lecture.
                log::trace!("Annulation clavier : {:?}", key.code);
                return Ok(true);
            }
            if remaining(deadline).is_zero() {
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wait_runs_to_timeout() {
        let mut cancel = FlagCancel::new();
        let start = Instant::now();
        assert!(!cancel.wait(Duration::from_millis(30)).unwrap());
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn flag_raised_from_another_thread_cuts_the_wait_short() {
        let mut cancel = FlagCancel::new();
        let handle = cancel.handle();
        let t = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.store(true, Ordering::Release);
        });
        let start = Instant::now();
        assert!(cancel.wait(Duration::from_secs(10)).unwrap());
        assert!(start.elapsed() < Duration::from_secs(2));
        t.join().unwrap();
    }

    #[test]
    fn zero_timeout_is_a_plain_check() {
        let mut cancel = FlagCancel::new();
        assert!(!cancel.wait(Duration::ZERO).unwrap());
        cancel.clone().cancel();
        assert!(cancel.wait(Duration::ZERO).unwrap());
    }

    #[test]
    fn timeout_beyond_instant_range_does_not_overflow() {
        let mut cancel = FlagCancel::new();
        cancel.cancel();
        assert!(cancel.wait(Duration::MAX).unwrap());
        assert_eq!(remaining(None), Duration::MAX);
    }
}
