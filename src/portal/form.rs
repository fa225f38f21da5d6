use std::time::Duration;

use super::{Locator, Page};
use crate::error::Result;
use crate::fmt;
use crate::models::{PaymentMethod, Transaction};

pub const DATE: Locator = Locator::Id("datepicker");
pub const PROVIDER: Locator = Locator::Id("provider");
pub const DESCRIPTION: Locator = Locator::Id("description");
pub const AMOUNT: Locator = Locator::Id("amount");
pub const PAYMENT_METHOD: Locator = Locator::Id("pmt_method");
pub const REIMBURSED_AMOUNT: Locator = Locator::Id("reimbursed_amount");
pub const CATEGORY: Locator = Locator::Id("category");
pub const NOTES: Locator = Locator::Id("notes");
pub const CREATE: Locator = Locator::Name("create_purchase");

/// Enter one transaction into the new-purchase form and submit it.
pub fn fill_form(page: &mut dyn Page, tx: &Transaction) -> Result<()> {
    let amount = fmt::amount(tx.amount);
    page.type_text(DATE, &tx.date)?;
    page.type_text(PROVIDER, &tx.provider)?;
    page.type_text(DESCRIPTION, tx.expense_type.label())?;
    page.type_text(AMOUNT, &amount)?;
    page.select_text(PAYMENT_METHOD, tx.payment_method.label())?;
    let reimbursed = if tx.payment_method == PaymentMethod::HsaAccount {
        amount.as_str()
    } else {
        "0"
    };
    page.type_text(REIMBURSED_AMOUNT, reimbursed)?;
    page.select_text(CATEGORY, tx.category.label())?;
    page.type_text(NOTES, &tx.receipt_file_name())?;
    page.click(CREATE)?;
    tracing::info!(receipt = %tx.receipt_number, "submitted claim");
    Ok(())
}

pub fn fill_all(page: &mut dyn Page, transactions: &[Transaction], step_delay: Duration) -> Result<()> {
    for tx in transactions {
        println!("Submitting {} ({} {})", tx.receipt_number, tx.provider, fmt::money(tx.amount));
        page.pause(step_delay);
        fill_form(page, tx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseType};
    use crate::portal::testing::{Action, FakePage};

    fn tx(method: PaymentMethod) -> Transaction {
        Transaction {
            date: "03/14/2024".into(),
            provider: "Eye Care".into(),
            amount: 42.5,
            payment_method: method,
            category: Category::Vision,
            expense_type: ExpenseType::Medical,
            receipt_number: "R6".into(),
            in_hsa: method == PaymentMethod::HsaAccount,
            attachments: true,
            notes: "glasses".into(),
            new_filename: "R6_42.50".into(),
        }
    }

    #[test]
    fn test_fill_form_hsa_account() {
        let mut page = FakePage::new();
        fill_form(&mut page, &tx(PaymentMethod::HsaAccount)).unwrap();
        assert_eq!(
            page.actions,
            vec![
                Action::Type(DATE, "03/14/2024".into()),
                Action::Type(PROVIDER, "Eye Care".into()),
                Action::Type(DESCRIPTION, "Medical".into()),
                Action::Type(AMOUNT, "42.50".into()),
                Action::Select(PAYMENT_METHOD, "HSA Account".into()),
                Action::Type(REIMBURSED_AMOUNT, "42.50".into()),
                Action::Select(CATEGORY, "Vision".into()),
                Action::Type(NOTES, "R6_42.50.pdf".into()),
                Action::Click(CREATE),
            ]
        );
    }

    #[test]
    fn test_credit_is_not_reimbursed() {
        let mut page = FakePage::new();
        fill_form(&mut page, &tx(PaymentMethod::Credit)).unwrap();
        assert!(page.actions.contains(&Action::Type(REIMBURSED_AMOUNT, "0".into())));
        assert!(page.actions.contains(&Action::Select(PAYMENT_METHOD, "Credit".into())));
    }

    #[test]
    fn test_missing_element_aborts() {
        let mut page = FakePage::new();
        page.missing.push(CATEGORY);
        assert!(fill_form(&mut page, &tx(PaymentMethod::HsaAccount)).is_err());
        assert!(!page.clicks().contains(&CREATE));
    }

    #[test]
    fn test_fill_all_submits_each() {
        let mut page = FakePage::new();
        let txs = vec![tx(PaymentMethod::HsaAccount), tx(PaymentMethod::Credit)];
        fill_all(&mut page, &txs, Duration::ZERO).unwrap();
        assert_eq!(page.clicks(), vec![CREATE, CREATE]);
    }
}
