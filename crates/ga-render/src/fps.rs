use std::time::Instant;

/// Mesure du débit réel de lecture, moyenne du premier au dernier tick.
///
/// # Example
/// ```
/// use ga_render::fps::FpsMeter;
/// let mut meter = FpsMeter::new();
/// meter.tick();
/// assert_eq!(meter.frames(), 1);
/// assert!(meter.average_fps().abs() < f64::EPSILON);
/// ```
#[derive(Debug, Default)]
pub struct FpsMeter {
    first: Option<Instant>,
    last: Option<Instant>,
    frames: usize,
}

impl FpsMeter {
    /// Meter with no frame counted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appeler une fois par frame, après l'affichage.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.first.get_or_insert(now);
        self.last = Some(now);
        self.frames += 1;
    }

    /// Frames counted so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Rate from first to last tick; 0 until two frames were seen.
    #[must_use]
    pub fn average_fps(&self) -> f64 {
        match (self.first, self.last) {
            (Some(a), Some(b)) if self.frames >= 2 => {
                let secs = b.duration_since(a).as_secs_f64();
                if secs > 0.0 {
                    (self.frames - 1) as f64 / secs
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}
