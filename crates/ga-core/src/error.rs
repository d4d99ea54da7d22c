use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// A decoded frame whose pixel buffer does not match its dimensions.
    #[error("Frame {index} malformée : {expected} octets attendus, {actual} reçus")]
    MalformedFrame {
        /// Source index of the frame.
        index: usize,
        /// Byte length implied by width, height and layout.
        expected: usize,
        /// Byte length actually present.
        actual: usize,
    },

    /// A stored frame whose shape differs from the first frame.
    #[error("Frame {index} incohérente : {expected:?} attendu, {found:?} trouvé (colonnes, lignes)")]
    InconsistentFrames {
        /// Index of the first offending frame.
        index: usize,
        /// Shape of frame 0.
        expected: (usize, usize),
        /// Shape of the offending frame.
        found: (usize, usize),
    },

    /// Resampling or assembly of one frame failed.
    #[error("Échec de conversion de la frame {index} : {reason}")]
    Conversion {
        /// Source index of the frame.
        index: usize,
        /// Underlying failure.
        reason: String,
    },

    /// The decoded animation holds no frame at all.
    #[error("Animation vide : aucune frame")]
    EmptyAnimation,
}
