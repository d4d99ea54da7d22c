use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use ga_ascii::converter::{ExecutionMode, SequenceConverter};
use ga_core::config::{ConvertConfig, PlaybackConfig};
use ga_core::store;
use ga_render::cancel::KeyCancel;
use ga_render::player::Player;
use ga_render::terminal::TerminalSession;
use ga_source::picker;

use crate::cli::{ConvertArgs, ListArgs, PlayArgs};
use crate::clipboard;

/// Nombre de caractères de l'aperçu.
const PREVIEW_CHARS: usize = 500;

/// `gifascii convert`
///
/// # Errors
/// Returns an error on invalid configuration, unreadable GIF, conversion
/// failure, or if the frame file cannot be written.
pub fn convert(args: &ConvertArgs, mut config: ConvertConfig) -> Result<()> {
    args.apply(&mut config);
    // Config errors surface before any file is touched.
    let mode = ExecutionMode::from_config(&config, args.sequential)?;
    let converter = SequenceConverter::new(&config)?;

    let path = match &args.gif {
        Some(path) => path.clone(),
        None => {
            let files = picker::list_gifs(&args.dir)?;
            if files.is_empty() {
                anyhow::bail!("Aucun fichier .gif dans {}", args.dir.display());
            }
            picker::pick(&files, &mut io::stdin().lock(), &mut io::stdout())?
        }
    };
    println!("Using {}", path.display());

    let animation = ga_source::decode_animation(&path)?;
    if let Some(first) = animation.frames.first() {
        let (w, h) = converter
            .rasterizer()
            .grid_size(first.buffer.width, first.buffer.height);
        println!(
            "{} frame(s), target ASCII size: {w}x{h} characters ({mode:?})",
            animation.len()
        );
    }

    let sequence = converter
        .convert(&animation, mode)
        .with_context(|| format!("Conversion de {} échouée", path.display()))?;

    if !args.no_preview
        && let Some(first) = sequence.get(0)
    {
        println!("\n{}\n", preview(first, PREVIEW_CHARS));
    }

    let written = store::save(&args.output, &sequence)?;
    println!(
        "Saved {} frame(s) to {} ({written} bytes)",
        sequence.len(),
        args.output.display()
    );

    if args.clipboard {
        let blob = store::encode(&sequence);
        match clipboard::copy(&blob) {
            Ok(()) => println!(
                "Copied {} frame(s) ({} characters) to clipboard",
                sequence.len(),
                blob.chars().count()
            ),
            Err(e) => log::warn!("{e:#}"),
        }
    }
    Ok(())
}

/// `gifascii play`
///
/// # Errors
/// Returns an error on invalid fps, unreadable or inconsistent frame file, or
/// terminal failure.
pub fn play(args: &PlayArgs, mut config: PlaybackConfig) -> Result<()> {
    args.apply(&mut config);
    config.fps = match args.fps {
        Some(fps) => fps,
        None if io::stdin().is_terminal() => {
            prompt_fps(&mut io::stdin().lock(), &mut io::stdout())?
        }
        None => config.fps,
    };
    let mut player = Player::new(config.clone())?;

    let sequence = store::load(&args.file)?;
    if sequence.is_empty() {
        anyhow::bail!("Aucune frame dans {}", args.file.display());
    }
    if !args.lenient {
        sequence
            .uniform_shape()
            .with_context(|| format!("Fichier de frames incohérent : {}", args.file.display()))?;
    }

    log::info!(
        "Lecture de {} frame(s) depuis {} à {} fps",
        sequence.len(),
        args.file.display(),
        config.fps
    );
    // Seuls les logs trace sont émis tant que la session est active.
    let report = {
        let mut session = TerminalSession::enter()?;
        player.play(&sequence, session.writer(), &mut KeyCancel)?
    };
    log::info!("Lecture terminée : {report:?}");
    println!(
        "Played {} frame(s) at {:.1} fps{}",
        report.frames_rendered,
        report.achieved_fps,
        if report.cancelled { " (stopped)" } else { "" }
    );
    Ok(())
}

/// `gifascii list`
///
/// # Errors
/// Returns an error if the directory cannot be read.
pub fn list(args: &ListArgs) -> Result<()> {
    let files = picker::list_gifs(&args.dir)?;
    if files.is_empty() {
        println!("No .gif files found in {}", args.dir.display());
        return Ok(());
    }
    picker::print_listing(&files, &mut io::stdout().lock())
}

/// Demande un FPS entier strictement positif jusqu'à obtenir une réponse valide.
///
/// # Errors
/// Returns an error on I/O failure or end of input.
pub fn prompt_fps<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<f64> {
    let mut line = String::new();
    loop {
        write!(output, "Enter FPS for animation: ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("Entrée fermée avant qu'un FPS soit saisi");
        }
        match line.trim().parse::<u32>() {
            Ok(fps) if fps > 0 => return Ok(f64::from(fps)),
            _ => writeln!(output, "Please enter a whole number greater than 0.")?,
        }
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
