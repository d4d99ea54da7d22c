use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extensions reconnues par le sélecteur.
const GIF_EXTS: &[&str] = &["gif"];

/// Liste les GIF d'un dossier (non récursif), triés par nom.
///
/// # Errors
/// Returns an error if the directory cannot be read.
///
/// # Example
/// ```no_run
/// use ga_source::picker::list_gifs;
/// use std::path::Path;
/// for gif in list_gifs(Path::new("gifs")).unwrap() {
///     println!("{}", gif.display());
/// }
/// ```
pub fn list_gifs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Impossible de lire {}", dir.display()))?
    {
        let path = entry?.path();
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| GIF_EXTS.contains(&e.to_lowercase().as_str()));
        if is_gif && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write the numbered list, one file per line, 1-based.
///
/// # Errors
/// Returns an error if `output` cannot be written.
pub fn print_listing<W: Write>(files: &[PathBuf], output: &mut W) -> Result<()> {
    writeln!(output, "Available GIFs")?;
    writeln!(output, "==============")?;
    for (idx, path) in files.iter().enumerate() {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        writeln!(output, "{:>3}. {name}", idx + 1)?;
    }
    Ok(())
}

/// Affiche la liste puis demande un numéro jusqu'à obtenir un choix valide.
///
/// # Errors
/// Returns an error if `files` is empty, on I/O failure, or if `input`
/// reaches end of stream before a valid choice.
pub fn pick<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    if files.is_empty() {
        anyhow::bail!("Aucun fichier .gif à sélectionner");
    }
    print_listing(files, output)?;

    let mut line = String::new();
    loop {
        write!(output, "\nPick a GIF (1-{}): ", files.len())?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("Entrée fermée avant qu'un GIF soit choisi");
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => return Ok(files[n - 1].clone()),
            Ok(_) => writeln!(output, "Number out of range, try again.")?,
            Err(_) => writeln!(output, "Please enter a valid number.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("gifs/a.gif"), PathBuf::from("gifs/b.gif")]
    }

    #[test]
    fn lists_only_gifs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.gif", "a.GIF", "notes.txt", "c.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.gif")).unwrap();
        let names: Vec<String> = list_gifs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.GIF", "b.gif"]);
    }

    #[test]
    fn retries_until_valid_choice() {
        let mut input = Cursor::new("zero\n7\n2\n");
        let mut output = Vec::new();
        let picked = pick(&files(), &mut input, &mut output).unwrap();
        assert_eq!(picked, PathBuf::from("gifs/b.gif"));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("  1. a.gif"));
        assert!(text.contains("Please enter a valid number."));
        assert!(text.contains("Number out of range, try again."));
    }

    #[test]
    fn eof_is_an_error() {
        let mut input = Cursor::new("abc\n");
        assert!(pick(&files(), &mut input, &mut Vec::new()).is_err());
    }

    #[test]
    fn empty_listing_is_an_error() {
        assert!(pick(&[], &mut Cursor::new("1\n"), &mut Vec::new()).is_err());
    }
}
