use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ga_core::config::{ConvertConfig, PlaybackConfig, Resampling};

/// gifascii : convertit un GIF en frames ASCII et les rejoue dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : gifascii.toml.
    #[arg(short, long, default_value = "gifascii.toml", global = true)]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convertir un GIF en fichier de frames.
    Convert(ConvertArgs),
    /// Rejouer un fichier de frames.
    Play(PlayArgs),
    /// Lister les GIF disponibles.
    List(ListArgs),
}

/// Resampling choices exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResamplingArg {
    Area,
    Nearest,
    Bicubic,
}

impl From<ResamplingArg> for Resampling {
    fn from(arg: ResamplingArg) -> Self {
        match arg {
            ResamplingArg::Area => Self::Area,
            ResamplingArg::Nearest => Self::Nearest,
            ResamplingArg::Bicubic => Self::Bicubic,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// GIF à convertir. Absent : choix interactif dans --dir.
    pub gif: Option<PathBuf>,

    /// Dossier parcouru par le sélecteur.
    #[arg(long, default_value = "gifs")]
    pub dir: PathBuf,

    /// Fichier de frames produit.
    #[arg(short, long, default_value = "frames.txt")]
    pub output: PathBuf,

    /// Largeur maximale en colonnes.
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Rapport hauteur/largeur d'une cellule terminal.
    #[arg(long)]
    pub char_ratio: Option<f32>,

    /// Glyphes du plus sombre au plus clair.
    #[arg(long)]
    pub palette: Option<String>,

    /// Nombre de threads de conversion.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Conversion mono-thread.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Algorithme de resampling.
    #[arg(long, value_enum)]
    pub resampling: Option<ResamplingArg>,

    /// Copier le résultat dans le presse-papiers (feature `clipboard`).
    #[arg(long, default_value_t = false)]
    pub clipboard: bool,

    /// Ne pas afficher l'aperçu de la première frame.
    #[arg(long, default_value_t = false)]
    pub no_preview: bool,
}

impl ConvertArgs {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut ConvertConfig) {
        if let Some(v) = self.max_width {
            config.max_width = v;
        }
        if let Some(v) = self.char_ratio {
            config.char_ratio = v;
        }
        if let Some(ref v) = self.palette {
            config.palette.clone_from(v);
        }
        if let Some(v) = self.workers {
            config.workers = Some(v);
        }
        if let Some(v) = self.resampling {
            config.resampling = v.into();
        }
    }
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Fichier de frames à rejouer.
    #[arg(default_value = "frames.txt")]
    pub file: PathBuf,

    /// Frames par seconde. Absent : demandé au lancement.
    #[arg(long)]
    pub fps: Option<f64>,

    /// Rejouer en boucle jusqu'à une touche.
    #[arg(long = "loop", default_value_t = false)]
    pub looping: bool,

    /// Accepter des frames de tailles différentes.
    #[arg(long, default_value_t = false)]
    pub lenient: bool,

    /// Masquer la ligne d'aide.
    #[arg(long, default_value_t = false)]
    pub no_footer: bool,
}

impl PlayArgs {
    /// Apply command-line overrides; `fps` is resolved separately.
    pub fn apply(&self, config: &mut PlaybackConfig) {
        if self.looping {
            config.looping = true;
        }
        if self.no_footer {
            config.footer = false;
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Dossier à parcourir.
    #[arg(long, default_value = "gifs")]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_overrides_apply() {
        let cli = Cli::parse_from([
            "gifascii",
            "convert",
            "cat.gif",
            "--max-width",
            "80",
            "--palette",
            " .#",
            "--workers",
            "2",
            "--resampling",
            "bicubic",
        ]);
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let mut config = ConvertConfig::default();
        args.apply(&mut config);
        assert_eq!(config.max_width, 80);
        assert_eq!(config.palette, " .#");
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.resampling, Resampling::Bicubic);
        assert_eq!(args.gif, Some(PathBuf::from("cat.gif")));
    }

    #[test]
    fn play_defaults() {
        let cli = Cli::parse_from(["gifascii", "play", "--loop"]);
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.file, PathBuf::from("frames.txt"));
        assert!(args.fps.is_none());
        let mut config = PlaybackConfig::default();
        args.apply(&mut config);
        assert!(config.looping);
        assert!(config.footer);
    }
}
