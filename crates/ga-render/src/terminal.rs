use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, terminal};

/// Session terminal de lecture : raw mode, écran alternatif, curseur masqué.
///
/// Everything is restored on `Drop`, including on error paths.
///
/// # Example
/// ```no_run
/// use ga_render::terminal::TerminalSession;
/// let mut session = TerminalSession::enter().unwrap();
/// let _out = session.writer();
/// // restored when `session` goes out of scope
/// ```
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    /// Prepare stdout for playback.
    ///
    /// # Errors
    /// Returns an error if raw mode or the alternate screen cannot be enabled.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Impossible d'activer le raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e).context("Impossible d'ouvrir l'écran alternatif");
        }
        Ok(Self { stdout })
    }

    /// Output stream owned by the session.
    pub fn writer(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
