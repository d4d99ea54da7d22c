use anyhow::Result;

/// Copie le texte dans le presse-papiers système.
///
/// # Errors
/// Returns an error if no clipboard is reachable.
#[cfg(feature = "clipboard")]
pub fn copy(text: &str) -> Result<()> {
    use anyhow::Context;

    let mut clipboard = arboard::Clipboard::new().context("Presse-papiers indisponible")?;
    clipboard
        .set_text(text)
        .context("Échec de la copie dans le presse-papiers")?;
    Ok(())
}

/// Builds without the `clipboard` feature cannot copy.
///
/// # Errors
/// Always.
#[cfg(not(feature = "clipboard"))]
pub fn copy(_text: &str) -> Result<()> {
    anyhow::bail!("Presse-papiers non disponible : compilé sans la feature 'clipboard'")
}
