//! Frame store: the flat text form of a `FrameSequence`.
//!
//! Frames are joined by a blank line (`"\n\n"`), rows by a single `'\n'`.
//! No header, no frame count, no per-frame duration.

use std::path::Path;

use anyhow::{Context, Result};

use crate::frame::FrameSequence;

/// Délimiteur entre deux frames.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Encode a sequence into one text blob.
///
/// A single trailing `'\n'` follows the last frame; `decode` ignores it.
///
/// # Example
/// ```
/// use ga_core::frame::FrameSequence;
/// use ga_core::store::{decode, encode};
/// let seq = FrameSequence::new(vec!["ab\ncd".into(), " .\n.:".into()]);
/// let blob = encode(&seq);
/// assert_eq!(blob, "ab\ncd\n\n .\n.:\n");
/// assert_eq!(decode(&blob), seq);
/// ```
#[must_use]
pub fn encode(sequence: &FrameSequence) -> String {
    let total: usize = sequence.iter().map(|f| f.len() + FRAME_DELIMITER.len()).sum();
    let mut out = String::with_capacity(total);
    for (i, frame) in sequence.iter().enumerate() {
        if i > 0 {
            out.push_str(FRAME_DELIMITER);
        }
        out.push_str(frame);
    }
    if !sequence.is_empty() {
        out.push('\n');
    }
    out
}

/// Decode a text blob into a sequence.
///
/// Never fails: CRLF line breaks are normalised, empty segments (trailing
/// delimiters, runs of blank lines) are dropped, and frame shapes are not
/// checked. See `FrameSequence::uniform_shape` for that.
///
/// # Example
/// ```
/// use ga_core::store::decode;
/// let seq = decode("ab\n\ncd\n\n\n");
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.get(1), Some("cd"));
/// ```
#[must_use]
pub fn decode(text: &str) -> FrameSequence {
    let normalised;
    let text = if text.contains('\r') {
        normalised = text.replace("\r\n", "\n");
        normalised.as_str()
    } else {
        text
    };
    let frames = text
        .split(FRAME_DELIMITER)
        .map(|segment| segment.trim_matches('\n'))
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    FrameSequence::new(frames)
}

/// Écrit la séquence encodée dans `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save(path: &Path, sequence: &FrameSequence) -> Result<usize> {
    let blob = encode(sequence);
    std::fs::write(path, &blob)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "{} frame(s) enregistrées dans {} ({} octets)",
        sequence.len(),
        path.display(),
        blob.len()
    );
    Ok(blob.len())
}

/// Charge et décode un fichier de frames.
///
/// # Errors
/// Returns an error if the file cannot be read or is not UTF-8.
///
/// # Example
/// ```no_run
/// use ga_core::store::load;
/// use std::path::Path;
/// let frames = load(Path::new("frames.txt")).unwrap();
/// ```
pub fn load(path: &Path) -> Result<FrameSequence> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let sequence = decode(&text);
    log::debug!("{} frame(s) lues depuis {}", sequence.len(), path.display());
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrameSequence {
        FrameSequence::new(vec![
            "  .:\n .:+".into(),
            "@#*+\n+*#@".into(),
            "    \n    ".into(),
        ])
    }

    #[test]
    fn round_trip_preserves_frames() {
        let seq = sample();
        assert_eq!(decode(&encode(&seq)), seq);
    }

    #[test]
    fn round_trip_tolerates_extra_trailing_delimiter() {
        let seq = sample();
        let blob = encode(&seq) + "\n\n";
        assert_eq!(decode(&blob), seq);
    }

    #[test]
    fn leading_spaces_of_first_frame_survive() {
        let seq = FrameSequence::new(vec!["  x\n   ".into()]);
        assert_eq!(decode(&encode(&seq)).get(0), Some("  x\n   "));
    }

    #[test]
    fn crlf_input_is_normalised() {
        let seq = decode("ab\r\ncd\r\n\r\nef\r\ngh\r\n");
        assert_eq!(seq, FrameSequence::new(vec!["ab\ncd".into(), "ef\ngh".into()]));
    }

    #[test]
    fn inconsistent_shapes_decode_without_error() {
        let seq = decode("abc\nde\n\nx\n");
        assert_eq!(seq.len(), 2);
        assert!(seq.uniform_shape().is_err());
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(encode(&FrameSequence::default()), "");
        assert!(decode("").is_empty());
        assert!(decode("\n\n\n\n").is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.txt");
        let seq = sample();
        let written = save(&path, &seq).unwrap();
        assert_eq!(written, encode(&seq).len());
        assert_eq!(load(&path).unwrap(), seq);
    }

    #[test]
    fn load_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.txt")).unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
