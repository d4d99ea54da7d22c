use std::time::Duration;

use crate::error::CoreError;

/// Disposition mémoire d'un pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelLayout {
    /// RGBA, 4 bytes par pixel.
    #[default]
    Rgba8,
    /// Niveaux de gris, 1 byte par pixel.
    Gray8,
}

impl PixelLayout {
    /// Bytes per pixel.
    #[inline(always)]
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Gray8 => 1,
        }
    }
}

/// Buffer de pixels décodé, row-major.
///
/// # Example
/// ```
/// use ga_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Raw pixels, row-major, `layout.bytes_per_pixel()` bytes per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout of `data`.
    pub layout: PixelLayout,
}

impl FrameBuffer {
    /// Crée un buffer RGBA noir aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
            layout: PixelLayout::Rgba8,
        }
    }

    /// Wrap a grayscale plane.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::gray(2, 1, vec![0, 255]);
    /// assert_eq!(fb.luminance(1, 0), 255);
    /// ```
    #[must_use]
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            width,
            height,
            layout: PixelLayout::Gray8,
        }
    }

    /// Wrap an RGBA buffer.
    #[must_use]
    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            width,
            height,
            layout: PixelLayout::Rgba8,
        }
    }

    /// Byte length implied by the dimensions and layout.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.bytes_per_pixel()
    }

    /// Vérifie que `data` correspond aux dimensions annoncées.
    ///
    /// # Errors
    /// Returns `CoreError::MalformedFrame` tagged with `index` on a length mismatch.
    pub fn validate(&self, index: usize) -> Result<(), CoreError> {
        let expected = self.expected_len();
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(CoreError::MalformedFrame {
                index,
                expected,
                actual: self.data.len(),
            })
        }
    }

    /// Luminance perceptuelle BT.709, alpha composé sur fond noir.
    ///
    /// Gray8 buffers return the stored value.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::rgba(1, 1, vec![255, 255, 255, 255]);
    /// assert_eq!(fb.luminance(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = y as usize * self.width as usize + x as usize;
        match self.layout {
            PixelLayout::Gray8 => self.data.get(idx).copied().unwrap_or(0),
            PixelLayout::Rgba8 => {
                let Some(px) = self.data.get(idx * 4..idx * 4 + 4) else {
                    return 0;
                };
                let lum = (u32::from(px[0]) * 2126 + u32::from(px[1]) * 7152 + u32::from(px[2]) * 722)
                    / 10000;
                (lum * u32::from(px[3]) / 255) as u8
            }
        }
    }

    /// Full luminance plane, row-major, `width * height` bytes.
    #[must_use]
    pub fn luminance_plane(&self) -> Vec<u8> {
        if self.layout == PixelLayout::Gray8 {
            return self.data.clone();
        }
        let mut plane = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                plane.push(self.luminance(x, y));
            }
        }
        plane
    }
}

/// One decoded animation frame and its display duration.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    /// Composed pixels of the frame.
    pub buffer: FrameBuffer,
    /// Durée d'affichage d'origine. Informative only; never persisted.
    pub delay: Duration,
}

/// Frames décodées, dans l'ordre de la source.
#[derive(Clone, Debug, Default)]
pub struct DecodedAnimation {
    /// Frames in source order.
    pub frames: Vec<DecodedFrame>,
}

impl DecodedAnimation {
    /// Build an animation from bare buffers with a zero delay.
    #[must_use]
    pub fn from_buffers(buffers: Vec<FrameBuffer>) -> Self {
        Self {
            frames: buffers
                .into_iter()
                .map(|buffer| DecodedFrame {
                    buffer,
                    delay: Duration::ZERO,
                })
                .collect(),
        }
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` if the animation holds no frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of the source delays.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(|f| f.delay).sum()
    }
}

/// Grille de glyphes d'une frame rendue, row-major.
///
/// # Example
/// ```
/// use ga_core::frame::GlyphGrid;
/// let grid = GlyphGrid::from_cells(2, 2, vec!['a', 'b', 'c', 'd']);
/// assert_eq!(grid.to_text(), "ab\ncd");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphGrid {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl GlyphGrid {
    /// Grid with no row.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from row-major cells.
    ///
    /// # Panics
    /// Debug builds assert that `cells.len() == width * height`.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, cells: Vec<char>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            cells,
            width,
            height,
        }
    }

    /// Width in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in characters.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x]
    }

    /// Rows as slices of glyphs.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Flatten into newline-separated rows, no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.height * (self.width + 1));
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.extend(row.iter());
        }
        text
    }
}

/// Séquence ordonnée de frames texte. Index = ordre d'affichage = ordre source.
///
/// # Example
/// ```
/// use ga_core::frame::FrameSequence;
/// let seq = FrameSequence::new(vec!["ab\ncd".into(), "ef\ngh".into()]);
/// assert_eq!(seq.uniform_shape().unwrap(), (2, 2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<String>,
}

impl FrameSequence {
    /// Wrap text blocks, already in display order.
    #[must_use]
    pub fn new(frames: Vec<String>) -> Self {
        Self { frames }
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` if the sequence holds no frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame text at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }

    /// Frames in display order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    /// Vérifie que toutes les frames sont rectangulaires et de même forme.
    ///
    /// Returns `(columns, rows)`; an empty sequence is `(0, 0)`.
    ///
    /// # Errors
    /// Returns `CoreError::InconsistentFrames` naming the first bad frame. For
    /// a ragged frame (rows of different widths, frame 0 included) `expected`
    /// is `(width of its first row, rows)` and `found` carries the width of
    /// the first row that differs.
    pub fn uniform_shape(&self) -> Result<(usize, usize), CoreError> {
        let Some(first) = self.frames.first() else {
            return Ok((0, 0));
        };
        let expected = text_shape(0, first)?;
        for (index, frame) in self.frames.iter().enumerate().skip(1) {
            let found = text_shape(index, frame)?;
            if found != expected {
                return Err(CoreError::InconsistentFrames {
                    index,
                    expected,
                    found,
                });
            }
        }
        Ok(expected)
    }
}

/// (columns, rows) of a rectangular text block.
fn text_shape(index: usize, text: &str) -> Result<(usize, usize), CoreError> {
    let widths: Vec<usize> = text.lines().map(|line| line.chars().count()).collect();
    let rows = widths.len();
    let Some(&cols) = widths.first() else {
        return Ok((0, 0));
    };
    match widths.iter().find(|&&w| w != cols) {
        Some(&w) => Err(CoreError::InconsistentFrames {
            index,
            expected: (cols, rows),
            found: (w, rows),
        }),
        None => Ok((cols, rows)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_luminance_uses_bt709() {
        let fb = FrameBuffer::rgba(3, 1, vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255]);
        assert_eq!(fb.luminance(0, 0), 54);
        assert_eq!(fb.luminance(1, 0), 182);
        assert_eq!(fb.luminance(2, 0), 18);
    }

    #[test]
    fn gray_rgba_is_exact() {
        for v in [0u8, 1, 85, 170, 254, 255] {
            let fb = FrameBuffer::rgba(1, 1, vec![v, v, v, 255]);
            assert_eq!(fb.luminance(0, 0), v);
        }
    }

    #[test]
    fn transparent_pixels_are_black() {
        let fb = FrameBuffer::rgba(1, 1, vec![255, 255, 255, 0]);
        assert_eq!(fb.luminance(0, 0), 0);
    }

    #[test]
    fn validate_reports_length_mismatch() {
        let fb = FrameBuffer::rgba(2, 2, vec![0; 15]);
        assert_eq!(
            fb.validate(7),
            Err(CoreError::MalformedFrame {
                index: 7,
                expected: 16,
                actual: 15
            })
        );
        assert!(FrameBuffer::gray(2, 2, vec![0; 4]).validate(0).is_ok());
    }

    #[test]
    fn luminance_plane_matches_per_pixel() {
        let fb = FrameBuffer::rgba(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 255]);
        assert_eq!(fb.luminance_plane(), vec![fb.luminance(0, 0), fb.luminance(1, 0)]);
    }

    #[test]
    fn grid_text_and_rows() {
        let grid = GlyphGrid::from_cells(3, 2, "abcdef".chars().collect());
        assert_eq!(grid.to_text(), "abc\ndef");
        assert_eq!(grid.rows().count(), 2);
        assert_eq!(grid.get(2, 1), 'f');
        assert_eq!(GlyphGrid::empty().to_text(), "");
    }

    #[test]
    fn uniform_shape_flags_first_mismatch() {
        let seq = FrameSequence::new(vec!["ab\ncd".into(), "ab\ncd".into(), "abc\ncd".into()]);
        assert!(matches!(
            seq.uniform_shape(),
            Err(CoreError::InconsistentFrames { index: 2, .. })
        ));
        let seq = FrameSequence::new(vec!["ab\ncd".into(), "ab".into()]);
        assert!(matches!(
            seq.uniform_shape(),
            Err(CoreError::InconsistentFrames {
                index: 1,
                expected: (2, 2),
                found: (2, 1)
            })
        ));
        assert_eq!(FrameSequence::default().uniform_shape(), Ok((0, 0)));
    }

    #[test]
    fn ragged_frames_are_rejected_even_when_alike() {
        let seq = FrameSequence::new(vec!["a\nbbb".into(), "cc\nd".into()]);
        assert_eq!(
            seq.uniform_shape(),
            Err(CoreError::InconsistentFrames {
                index: 0,
                expected: (1, 2),
                found: (3, 2)
            })
        );
        let seq = FrameSequence::new(vec!["ab\ncd".into(), "ab\ncd".into(), "ab\nc".into()]);
        assert!(matches!(
            seq.uniform_shape(),
            Err(CoreError::InconsistentFrames { index: 2, .. })
        ));
    }
}
