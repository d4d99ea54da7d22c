use ga_core::charset::GlyphLut;
use ga_core::config::{ConvertConfig, Resampling};
use ga_core::error::CoreError;
use ga_core::frame::{FrameBuffer, GlyphGrid};

use crate::resample::Resampler;

/// Taille de grille cible pour une source `src_w × src_h`.
///
/// `w = min(max_width, src_w)`, `h = round(src_h * w / src_w * char_ratio)`
/// clamped to `[1, src_h]`. A zero-sized source yields `(0, 0)`.
///
/// # Example
/// ```
/// use ga_ascii::rasterizer::target_size;
/// assert_eq!(target_size(4, 2, 4, 0.5), (4, 1));
/// assert_eq!(target_size(260, 100, 130, 0.55), (130, 28));
/// assert_eq!(target_size(0, 10, 80, 0.5), (0, 0));
/// ```
#[must_use]
pub fn target_size(src_w: u32, src_h: u32, max_width: u32, char_ratio: f32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (0, 0);
    }
    let w = max_width.min(src_w);
    let scale = f64::from(w) / f64::from(src_w);
    let h = (f64::from(src_h) * scale * f64::from(char_ratio)).round();
    let h = (h as u32).clamp(1, src_h);
    (w, h)
}

/// Convertit une frame décodée en grille de glyphes.
///
/// Built from a validated `ConvertConfig`; immutable afterwards and shared by
/// every conversion worker.
///
/// # Example
/// ```
/// use ga_ascii::rasterizer::Rasterizer;
/// use ga_core::config::ConvertConfig;
/// use ga_core::frame::FrameBuffer;
///
/// let config = ConvertConfig { max_width: 4, char_ratio: 0.5, palette: " .:+*#".into(), ..Default::default() };
/// let rasterizer = Rasterizer::new(&config).unwrap();
/// let frame = FrameBuffer::gray(4, 2, vec![0, 85, 170, 255, 0, 85, 170, 255]);
/// assert_eq!(rasterizer.rasterize(&frame).unwrap().to_text(), " .+#");
/// ```
#[derive(Clone)]
pub struct Rasterizer {
    max_width: u32,
    char_ratio: f32,
    resampling: Resampling,
    lut: GlyphLut,
}

impl Rasterizer {
    /// Validate `config` and precompute the glyph table.
    ///
    /// # Errors
    /// Returns `CoreError::Config` for any invalid conversion setting.
    pub fn new(config: &ConvertConfig) -> Result<Self, CoreError> {
        let palette = config.validate()?;
        Ok(Self {
            max_width: config.max_width,
            char_ratio: config.char_ratio,
            resampling: config.resampling,
            lut: GlyphLut::new(&palette),
        })
    }

    /// Output grid size for a source of the given dimensions.
    #[must_use]
    pub fn grid_size(&self, src_w: u32, src_h: u32) -> (u32, u32) {
        target_size(src_w, src_h, self.max_width, self.char_ratio)
    }

    /// One-shot rasterization with a throwaway resampler.
    ///
    /// # Errors
    /// See [`Rasterizer::rasterize_with`].
    pub fn rasterize(&self, frame: &FrameBuffer) -> Result<GlyphGrid, CoreError> {
        self.rasterize_with(0, frame, &mut Resampler::new())
    }

    /// Rasterize frame `index` using a caller-owned resampler.
    ///
    /// # Errors
    /// Returns `CoreError::MalformedFrame` if the pixel buffer does not match
    /// its dimensions, `CoreError::Conversion` if resampling fails.
    pub fn rasterize_with(
        &self,
        index: usize,
        frame: &FrameBuffer,
        resampler: &mut Resampler,
    ) -> Result<GlyphGrid, CoreError> {
        frame.validate(index)?;
        let (w, h) = self.grid_size(frame.width, frame.height);
        if w == 0 || h == 0 {
            return Ok(GlyphGrid::empty());
        }

        let plane = frame.luminance_plane();
        let samples = resampler
            .resample(&plane, frame.width, frame.height, w, h, self.resampling)
            .map_err(|reason| CoreError::Conversion { index, reason })?;

        let cells = samples.iter().map(|&s| self.lut.map(s)).collect();
        Ok(GlyphGrid::from_cells(w as usize, h as usize, cells))
    }
}
