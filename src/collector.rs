use regex::Regex;
use std::sync::OnceLock;

use crate::allocator::next_numbers;
use crate::error::Result;
use crate::models::{Category, ExpenseType, PaymentMethod, Transaction};
use crate::prompt::{ask_until, choose, Prompter};
use crate::receipts::receipt_stem;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap())
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d{1,2})?$").unwrap())
}

pub fn validate_date(raw: &str) -> bool {
    date_re().is_match(raw.trim())
}

pub fn validate_amount(raw: &str) -> bool {
    amount_re().is_match(raw.trim())
}

/// Ask for every field of one transaction. `existing` is the ledger's
/// current receipt numbers, used for the suggestion and the duplicate check.
pub fn collect_transaction(
    prompter: &mut dyn Prompter,
    existing: &[String],
    has_receipt: bool,
) -> Result<Transaction> {
    let date = ask_until(
        prompter,
        "Enter the date (DD/MM/YYYY)",
        |s| validate_date(s).then(|| s.trim().to_string()),
        "Invalid date format. Please enter the date in DD/MM/YYYY format.",
    )?;
    let provider = prompter.ask("Enter the provider")?;
    let amount = ask_until(
        prompter,
        "Enter the amount",
        |s| {
            if validate_amount(s) {
                s.trim().parse::<f64>().ok()
            } else {
                None
            }
        },
        "Invalid amount format. Please enter a valid number.",
    )?;
    let expense_type = choose(prompter, "Select the type:", ExpenseType::ALL, |t| t.label())?;
    let category = choose(prompter, "Select the category:", Category::ALL, |c| c.label())?;
    let payment_method = choose(
        prompter,
        "Select the payment method:",
        PaymentMethod::ALL,
        |m| m.label(),
    )?;

    let suggested = next_numbers(existing).suggest(payment_method);
    let receipt_number = confirm_receipt_number(prompter, &suggested, existing)?;

    let notes = prompter.ask("NOTES")?;
    let new_filename = receipt_stem(&receipt_number, amount);

    Ok(Transaction {
        date,
        provider,
        amount,
        payment_method,
        category,
        expense_type,
        in_hsa: payment_method == PaymentMethod::HsaAccount,
        attachments: has_receipt,
        receipt_number,
        notes,
        new_filename,
    })
}

fn confirm_receipt_number(
    prompter: &mut dyn Prompter,
    suggested: &str,
    existing: &[String],
) -> Result<String> {
    println!("Suggested Receipt Number: {suggested}");
    loop {
        match prompter.ask("Is this receipt number OK? Enter 1 for Yes, 0 for No")?.as_str() {
            "1" => return Ok(suggested.to_string()),
            "0" => break,
            _ => println!("Invalid input. Please enter 1 for Yes or 0 for No."),
        }
    }
    loop {
        let chosen = prompter.ask("Enter the correct receipt number")?;
        if chosen.is_empty() {
            println!("Receipt number cannot be empty.");
        } else if existing.iter().any(|e| e.trim().eq_ignore_ascii_case(&chosen)) {
            println!("Receipt number {chosen} is already in the ledger.");
        } else {
            return Ok(chosen);
        }
    }
}
