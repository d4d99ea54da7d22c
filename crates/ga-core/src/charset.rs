use crate::error::CoreError;

/// 12 caractères, palette historique, du plus sombre au plus clair.
pub const PALETTE_DEFAULT: &str = " .,:;+*?%$#@";

/// 10 caractères, compact, bon contraste.
pub const PALETTE_COMPACT: &str = " .:-=+*#%@";

/// Blocs Unicode (pseudo-pixels).
pub const PALETTE_BLOCKS: &str = " ░▒▓█";

/// Ordered glyph set, index 0 = darkest, last index = lightest.
///
/// Never empty.
///
/// # Example
/// ```
/// use ga_core::charset::Palette;
/// let palette = Palette::new(" .:#@").unwrap();
/// assert_eq!(palette.len(), 5);
/// assert!(Palette::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    /// Build a palette from a string ordered darkest→lightest.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if `glyphs` is empty.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::Config("la palette est vide".into()));
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in intensity order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            glyphs: PALETTE_DEFAULT.chars().collect(),
        }
    }
}

/// Palette index for a sample: `floor(sample / 256 * len)`, clamped to `len - 1`.
///
/// `len == 0` yields 0.
///
/// # Example
/// ```
/// use ga_core::charset::glyph_index;
/// assert_eq!(glyph_index(0, 6), 0);
/// assert_eq!(glyph_index(85, 6), 1);
/// assert_eq!(glyph_index(255, 6), 5);
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_index(sample: u8, len: usize) -> usize {
    (usize::from(sample) * len / 256).min(len.saturating_sub(1))
}

/// Lookup table mapping luminance [0..255] → glyph.
///
/// Pre-computed once per run for O(1) per-pixel cost.
///
/// # Example
/// ```
/// use ga_core::charset::{GlyphLut, Palette};
/// let lut = GlyphLut::new(&Palette::new(" .:#@").unwrap());
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
#[derive(Clone)]
pub struct GlyphLut {
    lut: [char; 256],
}

impl GlyphLut {
    /// Build the table for `palette`.
    #[must_use]
    pub fn new(palette: &Palette) -> Self {
        let glyphs = palette.glyphs();
        let mut lut = [' '; 256];
        for (sample, slot) in (0..=u8::MAX).zip(lut.iter_mut()) {
            *slot = glyphs[glyph_index(sample, glyphs.len())];
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a glyph.
    ///
    /// # Example
    /// ```
    /// use ga_core::charset::{GlyphLut, Palette};
    /// let lut = GlyphLut::new(&Palette::new(" .:#@").unwrap());
    /// assert_eq!(lut.map(128), ':');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_maps_extremes() {
        let lut = GlyphLut::new(&Palette::new(" .:#@").unwrap());
        assert_eq!(lut.map(0), ' ');
        assert_eq!(lut.map(255), '@');
    }

    #[test]
    fn index_is_monotonic_for_every_palette_length() {
        for len in 1..=80 {
            let mut prev = 0usize;
            for s in 0..=255u8 {
                let idx = glyph_index(s, len);
                assert!(idx >= prev, "non monotone à {s} pour len {len}");
                assert!(idx < len);
                prev = idx;
            }
            assert_eq!(glyph_index(255, len), len - 1);
        }
    }

    #[test]
    fn lut_agrees_with_index_formula() {
        let palette = Palette::new(" .:+*#").unwrap();
        let lut = GlyphLut::new(&palette);
        for s in 0..=255u8 {
            assert_eq!(lut.map(s), palette.glyphs()[usize::from(s) * 6 / 256]);
        }
    }

    #[test]
    fn single_glyph_palette_maps_everything_to_it() {
        let lut = GlyphLut::new(&Palette::new("#").unwrap());
        assert!((0..=255u8).all(|s| lut.map(s) == '#'));
    }

    #[test]
    fn empty_palette_is_a_config_error() {
        assert!(matches!(Palette::new(""), Err(CoreError::Config(_))));
    }

    #[test]
    fn multibyte_glyphs_count_as_one() {
        let palette = Palette::new(PALETTE_BLOCKS).unwrap();
        assert_eq!(palette.len(), 5);
        let lut = GlyphLut::new(&palette);
        assert_eq!(lut.map(255), '█');
    }
}
