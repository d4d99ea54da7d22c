use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ga_core::config::ConvertConfig;
use ga_core::error::CoreError;
use ga_core::frame::{DecodedAnimation, FrameSequence};
use rayon::prelude::*;

use crate::rasterizer::Rasterizer;
use crate::resample::Resampler;

/// Mode d'exécution de la conversion.
///
/// # Example
/// ```
/// use ga_ascii::converter::ExecutionMode;
/// let mode = ExecutionMode::default();
/// assert!(matches!(mode, ExecutionMode::Parallel { workers: None }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One frame after the other on the calling thread.
    Sequential,
    /// Dedicated rayon pool. `None` = available hardware concurrency.
    Parallel {
        /// Pool size.
        workers: Option<NonZeroUsize>,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Parallel { workers: None }
    }
}

impl ExecutionMode {
    /// Pick the mode from a config; `sequential` forces the single-threaded path.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the configured worker count is zero.
    pub fn from_config(config: &ConvertConfig, sequential: bool) -> Result<Self, CoreError> {
        let workers = config.worker_count()?;
        Ok(if sequential {
            Self::Sequential
        } else {
            Self::Parallel { workers }
        })
    }
}

/// Applique le rasterizer à toutes les frames d'une animation.
///
/// Output order is the source order in both modes.
///
/// # Example
/// ```
/// use ga_ascii::converter::{ExecutionMode, SequenceConverter};
/// use ga_core::config::ConvertConfig;
/// use ga_core::frame::{DecodedAnimation, FrameBuffer};
///
/// let converter = SequenceConverter::new(&ConvertConfig::default()).unwrap();
/// let anim = DecodedAnimation::from_buffers(vec![FrameBuffer::gray(2, 2, vec![0, 255, 255, 0])]);
/// let frames = converter.convert(&anim, ExecutionMode::Sequential).unwrap();
/// assert_eq!(frames.len(), 1);
/// ```
pub struct SequenceConverter {
    rasterizer: Rasterizer,
}

impl SequenceConverter {
    /// Validate the config up front; no frame is touched on failure.
    ///
    /// # Errors
    /// Returns `CoreError::Config` for any invalid conversion setting.
    pub fn new(config: &ConvertConfig) -> Result<Self, CoreError> {
        Ok(Self {
            rasterizer: Rasterizer::new(config)?,
        })
    }

    /// The rasterizer shared by every frame.
    #[must_use]
    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Convert every frame of `animation`.
    ///
    /// # Errors
    /// Returns `CoreError::EmptyAnimation` for an animation without frames, or
    /// the first frame error encountered; no partial sequence is returned.
    pub fn convert(
        &self,
        animation: &DecodedAnimation,
        mode: ExecutionMode,
    ) -> Result<FrameSequence, CoreError> {
        if animation.is_empty() {
            return Err(CoreError::EmptyAnimation);
        }
        let start = Instant::now();
        let frames = match mode {
            ExecutionMode::Sequential => self.convert_sequential(animation)?,
            ExecutionMode::Parallel { workers } => self.convert_parallel(animation, workers)?,
        };
        log::info!(
            "{} frame(s) converties en {:.1?} ({mode:?})",
            frames.len(),
            start.elapsed()
        );
        Ok(FrameSequence::new(frames))
    }

    fn convert_sequential(&self, animation: &DecodedAnimation) -> Result<Vec<String>, CoreError> {
        let total = animation.len();
        let mut resampler = Resampler::new();
        let mut frames = Vec::with_capacity(total);
        for (index, frame) in animation.frames.iter().enumerate() {
            let grid = self
                .rasterizer
                .rasterize_with(index, &frame.buffer, &mut resampler)?;
            frames.push(grid.to_text());
            log::debug!("Frame {}/{total} convertie", index + 1);
        }
        Ok(frames)
    }

    /// Each frame owns the output slot at its source index; the pool join is
    /// the only synchronisation point.
    fn convert_parallel(
        &self,
        animation: &DecodedAnimation,
        workers: Option<NonZeroUsize>,
    ) -> Result<Vec<String>, CoreError> {
        let total = animation.len();
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("ga-convert-{i}"));
        if let Some(n) = workers {
            builder = builder.num_threads(n.get());
        }
        let pool = builder
            .build()
            .map_err(|e| CoreError::Config(format!("pool de conversion : {e}")))?;
        log::debug!("Conversion parallèle sur {} worker(s)", pool.current_num_threads());

        let mut slots: Vec<Option<String>> = vec![None; total];
        let completed = AtomicUsize::new(0);

        pool.install(|| {
            slots
                .par_iter_mut()
                .zip(animation.frames.par_iter())
                .enumerate()
                .try_for_each_init(Resampler::new, |resampler, (index, (slot, frame))| {
                    let grid = self
                        .rasterizer
                        .rasterize_with(index, &frame.buffer, resampler)?;
                    *slot = Some(grid.to_text());
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    log::debug!("Frame {} convertie ({done}/{total})", index + 1);
                    Ok::<(), CoreError>(())
                })
        })?;

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| CoreError::Conversion {
                    index,
                    reason: "slot vide après la conversion".into(),
                })
            })
            .collect()
    }
}

/// Convenience: validate, then convert with `mode`.
///
/// # Errors
/// See [`SequenceConverter::new`] and [`SequenceConverter::convert`].
pub fn convert_animation(
    config: &ConvertConfig,
    animation: &DecodedAnimation,
    mode: ExecutionMode,
) -> Result<FrameSequence, CoreError> {
    SequenceConverter::new(config)?.convert(animation, mode)
}
