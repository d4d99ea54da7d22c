use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ga_core::frame::{DecodedAnimation, DecodedFrame, FrameBuffer};
use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

/// Décode toutes les frames d'un GIF, composées en RGBA, dans l'ordre source.
///
/// # Errors
/// Returns an error if the stream is not a decodable GIF.
///
/// # Example
/// ```no_run
/// use ga_source::gif::decode_gif;
/// use std::io::Cursor;
/// let bytes = std::fs::read("gifs/cat.gif").unwrap();
/// let anim = decode_gif(Cursor::new(bytes)).unwrap();
/// println!("{} frames", anim.len());
/// ```
pub fn decode_gif<R: BufRead + Seek>(reader: R) -> Result<DecodedAnimation> {
    let decoder = GifDecoder::new(reader).context("En-tête GIF invalide")?;
    let mut frames = Vec::new();
    for (index, frame) in decoder.into_frames().enumerate() {
        let frame = frame.with_context(|| format!("Frame {index} illisible"))?;
        let delay = Duration::from(frame.delay());
        let rgba = frame.into_buffer();
        let (width, height) = rgba.dimensions();
        frames.push(DecodedFrame {
            buffer: FrameBuffer::rgba(width, height, rgba.into_raw()),
            delay,
        });
        if (index + 1) % 50 == 0 {
            log::debug!("{} frame(s) extraites", index + 1);
        }
    }
    Ok(DecodedAnimation { frames })
}

/// Charge un fichier image animé ou fixe.
///
/// `.gif` files go through the animation decoder; anything else the `image`
/// crate can open becomes a one-frame animation.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use ga_source::gif::decode_animation;
/// use std::path::Path;
/// let anim = decode_animation(Path::new("gifs/cat.gif")).unwrap();
/// ```
pub fn decode_animation(path: &Path) -> Result<DecodedAnimation> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));

    let animation = if is_gif {
        let file =
            File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        decode_gif(BufReader::new(file))
            .with_context(|| format!("Impossible de décoder {}", path.display()))?
    } else {
        let img = image::open(path)
            .with_context(|| format!("Impossible de charger {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        DecodedAnimation {
            frames: vec![DecodedFrame {
                buffer: FrameBuffer::rgba(width, height, rgba.into_raw()),
                delay: Duration::ZERO,
            }],
        }
    };

    if let Some(first) = animation.frames.first() {
        log::info!(
            "{} : {} frame(s), {}x{} px, {:.2?} au total",
            path.display(),
            animation.len(),
            first.buffer.width,
            first.buffer.height,
            animation.total_duration()
        );
    }
    Ok(animation)
}
