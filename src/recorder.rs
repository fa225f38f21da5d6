use std::path::Path;

use colored::Colorize;

use crate::collector::collect_transaction;
use crate::error::{HsaError, Result};
use crate::ledger::Ledger;
use crate::models::Transaction;
use crate::pdf::show_receipt;
use crate::portal::form::fill_all;
use crate::portal::uploader::{ReceiptUploader, UploadOutcome};
use crate::portal::Page;
use crate::prompt::{ask_until, Prompter};
use crate::receipts::{list_pdfs, rename_receipt};
use crate::settings::Settings;

/// Load the ledger, or start a new one if the file does not exist yet.
pub fn open_ledger(path: &Path, sheet_name: Option<&str>) -> Result<Ledger> {
    if path.exists() {
        Ledger::load(path, sheet_name)
    } else {
        tracing::info!(path = %path.display(), "creating new ledger");
        Ok(Ledger::create(path, sheet_name))
    }
}

/// Collect one transaction and persist it as the newest ledger row.
fn record_one(
    prompter: &mut dyn Prompter,
    settings: &Settings,
    receipt: Option<&Path>,
) -> Result<Transaction> {
    let mut ledger = open_ledger(&settings.ledger_path(), settings.sheet_name())?;
    let existing = ledger.receipt_numbers()?;
    let tx = collect_transaction(prompter, &existing, receipt.is_some())?;

    let renamed = match receipt {
        Some(path) => {
            let renamed = rename_receipt(path, &tx.new_filename)?;
            let from = path.file_name().unwrap_or_default().to_string_lossy();
            let to = renamed.file_name().unwrap_or_default().to_string_lossy();
            println!("Renamed '{from}' to '{to}'\n");
            Some((path, renamed))
        }
        None => None,
    };

    if let Err(e) = ledger.insert_transaction(&tx).and_then(|()| ledger.save()) {
        if let Some((original, renamed)) = renamed.filter(|(o, r)| *o != r.as_path()) {
            match std::fs::rename(&renamed, original) {
                Ok(()) => tracing::info!(path = %original.display(), "restored receipt name after failed save"),
                Err(undo) => tracing::warn!(error = %undo, path = %renamed.display(), "could not restore receipt name"),
            }
        }
        return Err(e);
    }
    println!("{}", format!("Recorded {} in {}", tx.receipt_number, ledger.path().display()).green());
    Ok(tx)
}

/// Walk every PDF in the receipts folder: show it, ask for its details,
/// rename it to its receipt stem, and record it.
pub fn record_receipts(prompter: &mut dyn Prompter, settings: &Settings) -> Result<Vec<Transaction>> {
    let pdfs = list_pdfs(&settings.receipts_dir())?;
    if pdfs.is_empty() {
        println!("No PDF files found in the directory.");
        return Ok(Vec::new());
    }
    let total = pdfs.len();
    let mut recorded = Vec::with_capacity(total);
    for (i, pdf) in pdfs.iter().enumerate() {
        println!("{}", format!("Receipt {} of {total}", i + 1).bold());
        show_receipt(pdf, settings.open_viewer);
        recorded.push(record_one(prompter, settings, Some(pdf))?);
    }
    Ok(recorded)
}

pub fn record_without_receipts(prompter: &mut dyn Prompter, settings: &Settings) -> Result<Vec<Transaction>> {
    let answer = prompter.ask("Do you have transactions without receipts? (yes/no)")?;
    if !answer.eq_ignore_ascii_case("yes") {
        return Ok(Vec::new());
    }
    let count: usize = ask_until(
        prompter,
        "How many transactions do you have to enter",
        |s| s.parse().ok(),
        "Please enter a whole number.",
    )?;
    let mut recorded = Vec::with_capacity(count);
    for n in 1..=count {
        println!("{}", format!("Transaction {n} of {count}").bold());
        recorded.push(record_one(prompter, settings, None)?);
    }
    Ok(recorded)
}

/// Both recording phases: receipts first, then receipt-less transactions.
pub fn record_all(prompter: &mut dyn Prompter, settings: &Settings) -> Result<Vec<Transaction>> {
    let mut transactions = record_receipts(prompter, settings)?;
    transactions.extend(record_without_receipts(prompter, settings)?);
    Ok(transactions)
}

#[derive(Debug, Default, PartialEq)]
pub struct SubmitSummary {
    pub submitted: usize,
    pub uploaded: usize,
    pub unmatched: Vec<String>,
}

/// Create a portal claim for every transaction, then attach receipts to the
/// ones paid from the HSA.
pub fn submit(page: &mut dyn Page, settings: &Settings, transactions: &[Transaction]) -> Result<SubmitSummary> {
    fill_all(page, transactions, settings.step_delay())?;
    let mut summary = SubmitSummary {
        submitted: transactions.len(),
        ..SubmitSummary::default()
    };

    let receipts_dir = settings.receipts_dir();
    let uploaded_dir = settings.uploaded_dir();
    let mut uploader = ReceiptUploader::new(page, &receipts_dir, &uploaded_dir, settings.settle());
    for tx in transactions.iter().filter(|t| t.wants_upload()) {
        let file_name = tx.receipt_file_name();
        match uploader.upload(&file_name) {
            Ok(UploadOutcome::Uploaded { .. }) => {
                println!("{}", format!("Uploaded {file_name}").green());
                summary.uploaded += 1;
            }
            Ok(UploadOutcome::NoMatch) => {
                println!("{}", format!("No portal record found for {file_name}").yellow());
                summary.unmatched.push(file_name);
            }
            Err(HsaError::ReceiptFileMissing(path)) => {
                println!("{}", format!("Receipt file missing: {path}").yellow());
                summary.unmatched.push(file_name);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}
