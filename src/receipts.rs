use std::path::{Path, PathBuf};

use crate::error::{HsaError, Result};
use crate::fmt;

/// `<receipt no>_<amount>`, the stem every recorded receipt file is renamed to.
pub fn receipt_stem(receipt_number: &str, amount: f64) -> String {
    format!("{}_{}", receipt_number.trim(), fmt::amount(amount))
}

fn is_pdf(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("pdf"))
}

/// PDFs directly inside `dir`, sorted by file name.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_pdf(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

pub fn has_pdfs(dir: &Path) -> Result<bool> {
    Ok(!list_pdfs(dir)?.is_empty())
}

/// Rename `path` to `<stem>.pdf` in the same directory.
pub fn rename_receipt(path: &Path, stem: &str) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let target = parent.join(format!("{stem}.pdf"));
    if target == path {
        return Ok(target);
    }
    if target.exists() {
        return Err(HsaError::FileExists(target.display().to_string()));
    }
    std::fs::rename(path, &target)?;
    tracing::info!(from = %path.display(), to = %target.display(), "renamed receipt");
    Ok(target)
}

/// First name in `dir` not yet taken: `file_name`, then `stem (2).ext`, `stem (3).ext`, ...
fn free_name(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or_default().to_string_lossy();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (2..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Move an uploaded receipt out of the working folder. Terminal state for a
/// receipt file; an earlier upload with the same name is never overwritten.
pub fn move_to_uploaded(source_dir: &Path, uploaded_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let source = source_dir.join(file_name);
    if !source.exists() {
        return Err(HsaError::ReceiptFileMissing(source.display().to_string()));
    }
    std::fs::create_dir_all(uploaded_dir)?;
    let destination = free_name(uploaded_dir, file_name);
    if destination.file_name() != Some(std::ffi::OsStr::new(file_name)) {
        tracing::warn!(file_name, to = %destination.display(), "uploaded folder already has this name");
    }
    std::fs::rename(&source, &destination)?;
    tracing::info!(to = %destination.display(), "moved uploaded receipt");
    Ok(destination)
}
