use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::ledger::Ledger;
use crate::models::PendingReceipt;
use crate::pdf::show_receipt;
use crate::portal::uploader::{ReceiptUploader, UploadOutcome};
use crate::portal::Page;
use crate::prompt::Prompter;
use crate::receipts::{list_pdfs, receipt_stem, rename_receipt};
use crate::settings::Settings;

#[derive(Debug, PartialEq)]
pub enum ReconcileOutcome {
    NothingPending,
    /// The user went through every local PDF without confirming one.
    NoFileMatched,
    /// File renamed, but no camera slot on the portal carried its name.
    NotOnPortal { receipt_number: String },
    Attached { receipt_number: String, row: usize },
}

impl PendingReceipt {
    /// Stem the receipt file should carry once matched.
    pub fn stem(&self) -> String {
        self.new_filename
            .clone()
            .unwrap_or_else(|| receipt_stem(&self.receipt_number, self.amount))
    }
}

pub fn pending_table(pending: &[PendingReceipt]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Provider", "Amount", "Receipt no"]);
    for p in pending {
        table.add_row(vec![
            Cell::new(p.index),
            Cell::new(&p.date),
            Cell::new(&p.provider),
            Cell::new(money(p.amount)),
            Cell::new(&p.receipt_number),
        ]);
    }
    table
}

pub fn select_pending(prompter: &mut dyn Prompter, pending: &[PendingReceipt]) -> Result<PendingReceipt> {
    loop {
        let answer = prompter.ask("Enter the index of the receipt you want to upload")?;
        let Ok(index) = answer.parse::<usize>() else {
            println!("Please enter a valid integer index.");
            continue;
        };
        match pending.iter().find(|p| p.index == index) {
            Some(p) => {
                println!(
                    "You selected receipt at index {index}: {} {} {} {}",
                    p.receipt_number,
                    p.date,
                    p.provider,
                    money(p.amount)
                );
                return Ok(p.clone());
            }
            None => println!("Invalid index. Please try again."),
        }
    }
}

/// Show local PDFs one at a time until the user confirms one belongs to
/// `selected`, then rename it to the row's receipt stem.
pub fn match_local_receipt(
    prompter: &mut dyn Prompter,
    settings: &Settings,
    selected: &PendingReceipt,
) -> Result<Option<PathBuf>> {
    for pdf in list_pdfs(&settings.receipts_dir())? {
        show_receipt(&pdf, settings.open_viewer);
        let answer = prompter.ask("Is this the receipt you want to match? Y or N")?;
        if answer.eq_ignore_ascii_case("y") {
            let renamed = rename_receipt(&pdf, &selected.stem())?;
            println!("{}", format!("Matched {} to {}", selected.receipt_number, renamed.display()).green());
            return Ok(Some(renamed));
        }
    }
    Ok(None)
}

/// Attach a receipt to a ledger row that was recorded without one.
/// The portal is only opened once a local file has been confirmed.
pub fn reconcile(
    prompter: &mut dyn Prompter,
    settings: &Settings,
    open_portal: impl FnOnce() -> Result<Box<dyn Page>>,
) -> Result<ReconcileOutcome> {
    let ledger = Ledger::load(&settings.ledger_path(), settings.sheet_name())?;
    let pending = ledger.pending()?;
    if pending.is_empty() {
        println!("{}", "Every ledger row already has its receipt attached.".green());
        return Ok(ReconcileOutcome::NothingPending);
    }

    println!("Receipts not uploaded:\n{}", pending_table(&pending));
    let selected = select_pending(prompter, &pending)?;

    let Some(renamed) = match_local_receipt(prompter, settings, &selected)? else {
        println!("{}", "No receipt was matched.".yellow());
        return Ok(ReconcileOutcome::NoFileMatched);
    };
    let file_name = renamed
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut page = open_portal()?;
    let outcome = ReceiptUploader::new(
        page.as_mut(),
        &settings.receipts_dir(),
        &settings.uploaded_dir(),
        settings.settle(),
    )
    .upload(&file_name)?;

    match outcome {
        UploadOutcome::Uploaded { .. } => {
            let mut ledger = Ledger::load(&settings.ledger_path(), settings.sheet_name())?;
            let row = ledger.mark_attached(&selected.receipt_number)?;
            ledger.save()?;
            println!(
                "{}",
                format!("Updated Attachments for {} and saved {}.", selected.receipt_number, ledger.path().display())
                    .green()
            );
            Ok(ReconcileOutcome::Attached {
                receipt_number: selected.receipt_number,
                row,
            })
        }
        UploadOutcome::NoMatch => {
            println!(
                "{}",
                format!("No portal record carries {file_name}; the ledger was not changed.").yellow()
            );
            Ok(ReconcileOutcome::NotOnPortal {
                receipt_number: selected.receipt_number,
            })
        }
    }
}
