use colored::Colorize;

use crate::error::Result;
use crate::portal::chrome::ChromePage;
use crate::portal::login;
use crate::prompt::TerminalPrompter;
use crate::recorder::{record_all, submit};
use crate::settings::{load_settings, resolve_credentials};

pub fn run(offline: bool) -> Result<()> {
    let settings = load_settings();
    let mut prompter = TerminalPrompter;

    let transactions = record_all(&mut prompter, &settings)?;
    if transactions.is_empty() {
        println!("NO TRANSACTIONS!");
        return Ok(());
    }
    if offline {
        println!("Recorded {} transaction(s); skipping the portal.", transactions.len());
        return Ok(());
    }

    let credentials = resolve_credentials(&settings)?;
    let mut page = ChromePage::launch()?;
    login(&mut page, &settings.portal_url, &credentials, settings.settle())?;
    let summary = submit(&mut page, &settings, &transactions)?;

    println!(
        "{}",
        format!(
            "Submitted {} claim(s), uploaded {} receipt(s).",
            summary.submitted, summary.uploaded
        )
        .green()
    );
    for name in &summary.unmatched {
        println!("  {} {name}", "not uploaded:".yellow());
    }
    Ok(())
}
