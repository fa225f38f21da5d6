use std::path::Path;

use colored::Colorize;

use crate::error::{HsaError, Result};

const WRAP_WIDTH: usize = 100;

pub fn extract_text(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path).map_err(|e| HsaError::Pdf(format!("{}: {e}", path.display())))
}

/// Hand the file to the desktop's default PDF viewer.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    opener::open(path).map_err(|e| HsaError::Viewer(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "opened receipt in viewer");
    Ok(())
}

/// Print a receipt's name and text for the user to read before answering
/// prompts. With `open_viewer`, the file is also opened in the system viewer
/// so scanned receipts with no text layer can be identified.
pub fn show_receipt(path: &Path, open_viewer: bool) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    println!("Filename: {}", name.bold());
    if open_viewer {
        if let Err(e) = open_in_viewer(path) {
            tracing::warn!(error = %e, "could not open receipt viewer");
            println!("{}", format!("Open {} manually to review it.", path.display()).yellow());
        }
    }
    println!("\nExtracted Text:\n");
    match extract_text(path) {
        Ok(text) => {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                println!("{}", textwrap::fill(line, WRAP_WIDTH));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not extract receipt text");
            println!("{}", "(no text could be extracted; open the file to review it)".yellow());
        }
    }
    println!("\n{}\n", "-".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, HsaError::Pdf(_)));
    }

    #[test]
    fn test_show_receipt_tolerates_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"garbage").unwrap();
        show_receipt(&path, false);
    }
}
