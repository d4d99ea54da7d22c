use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use ga_core::config::{PlaybackConfig, validate_fps};
use ga_core::error::CoreError;
use ga_core::frame::FrameSequence;

use crate::cancel::CancelSignal;
use crate::fps::FpsMeter;

/// Ligne d'aide affichée sous chaque frame.
pub const FOOTER_HINT: &str = "Press any key to end animation…";

/// Player state.
///
/// # Example
/// ```
/// use ga_render::player::PlayerState;
/// assert_eq!(PlayerState::default(), PlayerState::Idle);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// Pas de lecture en cours.
    #[default]
    Idle,
    /// Rendu en cours.
    Playing,
}

/// Bilan d'une lecture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackReport {
    /// Frames written to the output.
    pub frames_rendered: usize,
    /// `true` if a cancellation ended playback.
    pub cancelled: bool,
    /// Measured rate over the run (0 below two frames).
    pub achieved_fps: f64,
}

/// Lecteur de séquences à cadence fixe.
///
/// # Example
/// ```
/// use ga_core::config::PlaybackConfig;
/// use ga_core::frame::FrameSequence;
/// use ga_render::cancel::FlagCancel;
/// use ga_render::player::Player;
///
/// let config = PlaybackConfig { fps: 500.0, looping: false, footer: false };
/// let mut player = Player::new(config).unwrap();
/// let frames = FrameSequence::new(vec!["ab".into(), "cd".into()]);
/// let mut out = Vec::new();
/// let report = player.play(&frames, &mut out, &mut FlagCancel::new()).unwrap();
/// assert_eq!(report.frames_rendered, 2);
/// ```
pub struct Player {
    config: PlaybackConfig,
    delay: Duration,
    state: PlayerState,
}

impl Player {
    /// Validate the playback settings; the player starts `Idle`.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if `fps` is not a usable frame rate.
    pub fn new(config: PlaybackConfig) -> Result<Self, CoreError> {
        let delay = validate_fps(config.fps)?;
        Ok(Self {
            config,
            delay,
            state: PlayerState::Idle,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Inter-frame delay `1 / fps`.
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        self.delay
    }

    /// Play `frames` once (or until cancelled when looping) into `out`.
    ///
    /// Returns to `Idle` whatever the outcome.
    ///
    /// # Errors
    /// Returns an error if writing to `out` or polling `cancel` fails.
    pub fn play<W: Write, C: CancelSignal>(
        &mut self,
        frames: &FrameSequence,
        out: &mut W,
        cancel: &mut C,
    ) -> Result<PlaybackReport> {
        self.state = PlayerState::Playing;
        // trace uniquement : stderr partage l'écran de lecture.
        log::trace!(
            "Lecture de {} frame(s) à {} fps (boucle : {})",
            frames.len(),
            self.config.fps,
            self.config.looping
        );
        let result = self.run(frames, out, cancel);
        self.state = PlayerState::Idle;
        if let Ok(report) = &result {
            log::trace!(
                "Lecture terminée : {} frame(s), {:.1} fps mesurés, annulée : {}",
                report.frames_rendered,
                report.achieved_fps,
                report.cancelled
            );
        }
        result
    }

    fn run<W: Write, C: CancelSignal>(
        &self,
        frames: &FrameSequence,
        out: &mut W,
        cancel: &mut C,
    ) -> Result<PlaybackReport> {
        let delay = self.delay;
        let footer = self.config.footer.then_some(FOOTER_HINT);
        let mut meter = FpsMeter::new();
        let mut cancelled = false;

        'playback: loop {
            for frame in frames.iter() {
                let started = Instant::now();
                render_frame(out, frame, footer)?;
                meter.tick();
                if cancel.wait(delay.saturating_sub(started.elapsed()))? {
                    cancelled = true;
                    break 'playback;
                }
            }
            if !self.config.looping || frames.is_empty() {
                break;
            }
        }

        Ok(PlaybackReport {
            frames_rendered: meter.frames(),
            cancelled,
            achieved_fps: meter.average_fps(),
        })
    }
}

/// Réécrit l'écran depuis le coin haut-gauche avec une frame.
///
/// Each row overwrites the previous one and clears what is left of the line;
/// everything below the frame (and the optional footer) is cleared.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn render_frame<W: Write>(out: &mut W, frame: &str, footer: Option<&str>) -> std::io::Result<()> {
    let mut row: u16 = 0;
    for line in frame.lines() {
        queue!(out, MoveTo(0, row), Print(line), Clear(ClearType::UntilNewLine))?;
        row = row.saturating_add(1);
    }
    if let Some(footer) = footer {
        queue!(out, MoveTo(0, row), Print(footer), Clear(ClearType::UntilNewLine))?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;

    use super::*;
    use crate::cancel::FlagCancel;

    fn frames(n: usize) -> FrameSequence {
        FrameSequence::new((0..n).map(|i| format!("frame{i}\n#####")).collect())
    }

    fn config(fps: f64, looping: bool) -> PlaybackConfig {
        PlaybackConfig {
            fps,
            looping,
            footer: true,
        }
    }

    #[test]
    fn plays_every_frame_once_in_order() {
        let mut player = Player::new(config(1000.0, false)).unwrap();
        let mut out = Vec::new();
        let report = player.play(&frames(5), &mut out, &mut FlagCancel::new()).unwrap();
        assert_eq!(report.frames_rendered, 5);
        assert!(!report.cancelled);
        assert_eq!(player.state(), PlayerState::Idle);

        let text = String::from_utf8(out).unwrap();
        let positions: Vec<usize> = (0..5)
            .map(|i| text.find(&format!("frame{i}")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches(FOOTER_HINT).count(), 5);
    }

    #[test]
    fn immediate_cancel_renders_at_most_one_frame() {
        let mut player = Player::new(config(1.0, true)).unwrap();
        let cancel = FlagCancel::new();
        cancel.cancel();
        let start = Instant::now();
        let report = player
            .play(&frames(10), &mut Vec::new(), &mut cancel.clone())
            .unwrap();
        assert!(report.frames_rendered <= 1);
        assert!(report.cancelled);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn cancel_latency_does_not_depend_on_frame_delay() {
        let mut player = Player::new(config(0.2, false)).unwrap();
        let mut cancel = FlagCancel::new();
        let handle = cancel.handle();
        let t = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            handle.store(true, Ordering::Release);
        });
        let start = Instant::now();
        let report = player.play(&frames(3), &mut Vec::new(), &mut cancel).unwrap();
        assert_eq!(report.frames_rendered, 1);
        assert!(start.elapsed() < Duration::from_secs(2));
        t.join().unwrap();
    }

    #[test]
    fn looping_runs_past_the_end_until_cancelled() {
        let mut player = Player::new(config(400.0, true)).unwrap();
        let mut cancel = FlagCancel::new();
        let handle = cancel.handle();
        let t = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            handle.store(true, Ordering::Release);
        });
        let report = player.play(&frames(3), &mut Vec::new(), &mut cancel).unwrap();
        assert!(report.cancelled);
        assert!(report.frames_rendered > 3);
        t.join().unwrap();
    }

    #[test]
    fn empty_sequence_returns_immediately_even_when_looping() {
        let mut player = Player::new(config(10.0, true)).unwrap();
        let report = player
            .play(&FrameSequence::default(), &mut Vec::new(), &mut FlagCancel::new())
            .unwrap();
        assert_eq!(report.frames_rendered, 0);
        assert!(!report.cancelled);
    }

    #[test]
    fn invalid_fps_is_rejected_before_playing() {
        for fps in [0.0, -1.0, f64::NAN, 1e-20] {
            assert!(matches!(
                Player::new(config(fps, false)),
                Err(CoreError::Config(_))
            ));
        }
    }

    #[test]
    fn slowest_valid_fps_plays_without_overflow() {
        let mut player = Player::new(config(1e-19, false)).unwrap();
        let cancel = FlagCancel::new();
        cancel.cancel();
        let report = player
            .play(&frames(2), &mut Vec::new(), &mut cancel.clone())
            .unwrap();
        assert_eq!(report.frames_rendered, 1);
        assert!(report.cancelled);
    }

    #[test]
    fn frame_delay_is_inverse_of_fps() {
        let player = Player::new(config(4.0, false)).unwrap();
        assert_eq!(player.frame_delay(), Duration::from_millis(250));
    }

    #[test]
    fn render_frame_without_footer() {
        let mut out = Vec::new();
        render_frame(&mut out, "ab\ncd", None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ab") && text.contains("cd"));
        assert!(!text.contains(FOOTER_HINT));
    }
}
