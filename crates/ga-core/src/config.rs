use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{PALETTE_DEFAULT, Palette};
use crate::error::CoreError;

/// Largeur maximale par défaut, en colonnes.
pub const DEFAULT_MAX_WIDTH: u32 = 130;

/// Rapport hauteur/largeur d'une cellule par défaut.
pub const DEFAULT_CHAR_RATIO: f32 = 0.55;

/// FPS de lecture par défaut.
pub const DEFAULT_FPS: f64 = 24.0;

/// Resampling algorithm used by the rasterizer.
///
/// # Example
/// ```
/// use ga_core::config::Resampling;
/// assert_eq!(Resampling::default(), Resampling::Area);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Resampling {
    /// Exact box average over each destination cell.
    #[default]
    Area,
    /// Nearest neighbour.
    Nearest,
    /// Catmull-Rom convolution.
    Bicubic,
}

/// Paramètres de conversion, immuables pendant un run.
///
/// # Example
/// ```
/// use ga_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.max_width, 130);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Plafond de largeur en colonnes (MAX_WIDTH).
    pub max_width: u32,
    /// Hauteur/largeur d'une cellule terminal (CHAR_RATIO).
    pub char_ratio: f32,
    /// Glyphes du plus sombre au plus clair.
    pub palette: String,
    /// Taille du pool de conversion. `None` = parallélisme matériel.
    pub workers: Option<usize>,
    /// Resampling algorithm.
    pub resampling: Resampling,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            char_ratio: DEFAULT_CHAR_RATIO,
            palette: PALETTE_DEFAULT.to_string(),
            workers: None,
            resampling: Resampling::Area,
        }
    }
}

impl ConvertConfig {
    /// Check every field and build the palette.
    ///
    /// # Errors
    /// Returns `CoreError::Config` for a zero `max_width`, a non-positive or
    /// non-finite `char_ratio`, an empty palette, or `workers == Some(0)`.
    pub fn validate(&self) -> Result<Palette, CoreError> {
        if self.max_width == 0 {
            return Err(CoreError::Config("max_width doit être > 0".into()));
        }
        if !(self.char_ratio.is_finite() && self.char_ratio > 0.0) {
            return Err(CoreError::Config(format!(
                "char_ratio doit être > 0 (reçu {})",
                self.char_ratio
            )));
        }
        self.worker_count()?;
        Palette::new(&self.palette)
    }

    /// Worker count as a non-zero value; `Ok(None)` defers to the hardware.
    ///
    /// # Errors
    /// Returns `CoreError::Config` for `Some(0)`.
    pub fn worker_count(&self) -> Result<Option<NonZeroUsize>, CoreError> {
        match self.workers {
            None => Ok(None),
            Some(n) => NonZeroUsize::new(n)
                .map(Some)
                .ok_or_else(|| CoreError::Config("workers doit être > 0".into())),
        }
    }
}

/// Paramètres de lecture.
///
/// # Example
/// ```
/// use ga_core::config::PlaybackConfig;
/// let config = PlaybackConfig::default();
/// assert!(!config.looping);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Frames par seconde demandées.
    pub fps: f64,
    /// Rejouer en boucle jusqu'à annulation.
    pub looping: bool,
    /// Afficher la ligne d'aide sous la frame.
    pub footer: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            looping: false,
            footer: true,
        }
    }
}

/// Reject unusable frame rates and return the matching frame delay `1 / fps`.
///
/// # Errors
/// Returns `CoreError::Config` when `fps <= 0`, is not finite, or is so small
/// that `1 / fps` does not fit in a `Duration`.
///
/// # Example
/// ```
/// use ga_core::config::validate_fps;
/// use std::time::Duration;
/// assert_eq!(validate_fps(4.0).unwrap(), Duration::from_millis(250));
/// assert!(validate_fps(1e-20).is_err());
/// ```
pub fn validate_fps(fps: f64) -> Result<Duration, CoreError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(CoreError::Config(format!("fps doit être > 0 (reçu {fps})")));
    }
    Duration::try_from_secs_f64(1.0 / fps)
        .map_err(|_| CoreError::Config(format!("fps trop petit (reçu {fps})")))
}

/// Configuration complète de l'application.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Conversion settings.
    pub convert: ConvertConfig,
    /// Playback settings.
    pub playback: PlaybackConfig,
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    playback: Option<PlaybackSection>,
}

/// Convert section, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvertSection {
    max_width: Option<u32>,
    char_ratio: Option<f32>,
    palette: Option<String>,
    workers: Option<usize>,
    resampling: Option<Resampling>,
}

/// Playback section, all fields optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaybackSection {
    fps: Option<f64>,
    looping: Option<bool>,
    footer: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// Values are not validated here; callers validate right before use so CLI
/// overrides are checked too.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use ga_core::config::parse_config;
/// let config = parse_config("[convert]\nmax_width = 80\n").unwrap();
/// assert_eq!(config.convert.max_width, 80);
/// assert_eq!(config.playback.fps, 24.0);
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = AppConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.max_width {
            config.convert.max_width = v;
        }
        if let Some(v) = c.char_ratio {
            config.convert.char_ratio = v;
        }
        if let Some(v) = c.palette {
            config.convert.palette = v;
        }
        if let Some(v) = c.workers {
            config.convert.workers = Some(v);
        }
        if let Some(v) = c.resampling {
            config.convert.resampling = v;
        }
    }

    if let Some(p) = file.playback {
        if let Some(v) = p.fps {
            config.playback.fps = v;
        }
        if let Some(v) = p.looping {
            config.playback.looping = v;
        }
        if let Some(v) = p.footer {
            config.playback.footer = v;
        }
    }

    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ga_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("gifascii.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide dans {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        let palette = config.convert.validate().unwrap();
        assert_eq!(palette.len(), 12);
        assert!(validate_fps(config.playback.fps).is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config(
            "[convert]\npalette = \" .:\"\nresampling = \"Bicubic\"\n[playback]\nlooping = true\n",
        )
        .unwrap();
        assert_eq!(config.convert.palette, " .:");
        assert_eq!(config.convert.resampling, Resampling::Bicubic);
        assert_eq!(config.convert.max_width, DEFAULT_MAX_WIDTH);
        assert!(config.playback.looping);
        assert!((config.playback.fps - DEFAULT_FPS).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("[convert]\nmax_widht = 3\n").is_err());
    }

    #[test]
    fn negative_width_fails_to_parse() {
        assert!(parse_config("[convert]\nmax_width = -4\n").is_err());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let mut c = ConvertConfig {
            max_width: 0,
            ..ConvertConfig::default()
        };
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
        c.max_width = 10;
        c.char_ratio = 0.0;
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
        c.char_ratio = f32::NAN;
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
        c.char_ratio = 0.5;
        c.workers = Some(0);
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
        c.workers = Some(3);
        c.palette = String::new();
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn fps_must_be_positive() {
        assert!(validate_fps(0.0).is_err());
        assert!(validate_fps(-3.0).is_err());
        assert!(validate_fps(f64::INFINITY).is_err());
        assert!(validate_fps(0.5).is_ok());
    }

    #[test]
    fn fps_too_small_for_a_duration_is_rejected() {
        for fps in [1e-20, f64::MIN_POSITIVE, 5e-324] {
            assert!(matches!(validate_fps(fps), Err(CoreError::Config(_))), "{fps}");
        }
        assert_eq!(validate_fps(0.25).unwrap(), Duration::from_secs(4));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gifascii.toml");
        std::fs::write(&path, "[playback]\nfps = 12.5\n").unwrap();
        let config = load_config(&path).unwrap();
        assert!((config.playback.fps - 12.5).abs() < f64::EPSILON);
    }
}
