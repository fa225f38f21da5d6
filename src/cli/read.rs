use std::path::Path;

use crate::error::{HsaError, Result};
use crate::pdf::{extract_text, open_in_viewer};

pub fn run(file: &str, open: bool) -> Result<()> {
    let path = Path::new(file);
    if !path.exists() {
        return Err(HsaError::ReceiptFileMissing(file.to_string()));
    }
    if open {
        open_in_viewer(path)?;
    }
    let text = extract_text(path)?;
    println!("{}", text.trim_end());
    Ok(())
}
