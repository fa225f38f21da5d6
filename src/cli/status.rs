use crate::error::Result;
use crate::ledger::Ledger;
use crate::receipts::{has_pdfs, list_pdfs};
use crate::settings::{load_settings, settings_file_exists, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let receipts_dir = settings.receipts_dir();
    let ledger_path = settings.ledger_path();

    println!(
        "Settings:   {}{}",
        settings_path().display(),
        if settings_file_exists() { "" } else { " (defaults)" }
    );
    println!("Receipts:   {}", receipts_dir.display());
    println!("Uploaded:   {}", settings.uploaded_dir().display());
    println!("Ledger:     {}", ledger_path.display());
    println!("Sheet:      {}", settings.sheet_name().unwrap_or("(first sheet)"));
    println!("Portal:     {}", settings.portal_url);
    println!("Viewer:     {}", if settings.open_viewer { "on" } else { "off" });
    println!("Email:      {}", if settings.email.is_empty() { "(not set)" } else { &settings.email });

    println!();
    if receipts_dir.is_dir() && has_pdfs(&receipts_dir)? {
        println!("New PDFs:      {}", list_pdfs(&receipts_dir)?.len());
    } else {
        println!("New PDFs:      0");
    }

    if ledger_path.exists() {
        let ledger = Ledger::load(&ledger_path, settings.sheet_name())?;
        if ledger.is_empty() {
            println!("Transactions:  0");
        } else {
            println!("Transactions:  {}", ledger.len());
            println!("Pending:       {}", ledger.pending()?.len());
        }
    } else {
        println!("Ledger not found. Run `hsa-receipts init` to set up.");
    }
    Ok(())
}
