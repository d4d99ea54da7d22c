use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use ga_core::config::Resampling;

/// Resampler réutilisable pour plans de luminance (1 byte/pixel).
///
/// `Area` is computed in place with exact integer averages; `Nearest` and
/// `Bicubic` go through fast_image_resize. One instance per worker thread.
///
/// # Example
/// ```
/// use ga_ascii::resample::Resampler;
/// use ga_core::config::Resampling;
/// let mut r = Resampler::new();
/// let out = r.resample(&[0, 100, 200, 255], 4, 1, 2, 1, Resampling::Area).unwrap();
/// assert_eq!(out, vec![50, 228]);
/// ```
pub struct Resampler {
    inner: FirResizer,
    /// Scratch copy of the source plane (fast_image_resize borrows it mutably).
    src_buf: Vec<u8>,
}

impl Resampler {
    /// Create a new resampler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resample a `src_w × src_h` plane to `dst_w × dst_h`.
    ///
    /// Identical dimensions return a copy. Callers never ask for a larger
    /// destination than the source.
    ///
    /// # Errors
    /// Returns a description of the failure if fast_image_resize rejects the
    /// buffers or the resize itself fails.
    pub fn resample(
        &mut self,
        plane: &[u8],
        src_w: u32,
        src_h: u32,
        dst_w: u32,
        dst_h: u32,
        resampling: Resampling,
    ) -> Result<Vec<u8>, String> {
        if src_w == dst_w && src_h == dst_h {
            return Ok(plane.to_vec());
        }
        let alg = match resampling {
            Resampling::Area => return Ok(area_average(plane, src_w, src_h, dst_w, dst_h)),
            Resampling::Nearest => ResizeAlg::Nearest,
            Resampling::Bicubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        };

        self.src_buf.clear();
        self.src_buf.extend_from_slice(plane);
        let src_image = Image::from_slice_u8(src_w, src_h, &mut self.src_buf, PixelType::U8)
            .map_err(|e| format!("source invalide : {e}"))?;

        let mut dst = vec![0u8; dst_w as usize * dst_h as usize];
        let mut dst_image = Image::from_slice_u8(dst_w, dst_h, &mut dst, PixelType::U8)
            .map_err(|e| format!("destination invalide : {e}"))?;

        let options = ResizeOptions::new().resize_alg(alg);
        self.inner
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| format!("resize : {e}"))?;
        drop(dst_image);
        Ok(dst)
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Box average of each destination cell's source footprint, rounded to nearest.
///
/// Footprint edges are `floor(i * src / dst)`; every footprint holds at least
/// one source pixel.
#[must_use]
pub fn area_average(plane: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let (sw, sh) = (src_w as usize, src_h as usize);
    let (dw, dh) = (dst_w as usize, dst_h as usize);
    let mut out = Vec::with_capacity(dw * dh);
    if sw == 0 || sh == 0 {
        return out;
    }
    for dy in 0..dh {
        let y0 = dy * sh / dh;
        let y1 = ((dy + 1) * sh / dh).max(y0 + 1).min(sh);
        for dx in 0..dw {
            let x0 = dx * sw / dw;
            let x1 = ((dx + 1) * sw / dw).max(x0 + 1).min(sw);
            let mut sum = 0u64;
            for row in plane[y0 * sw..y1 * sw].chunks_exact(sw) {
                sum += row[x0..x1].iter().map(|&v| u64::from(v)).sum::<u64>();
            }
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            out.push(((sum + count / 2) / count) as u8);
        }
    }
    out
}
