use crate::allocator::next_numbers;
use crate::error::Result;
use crate::models::PaymentMethod;
use crate::recorder::open_ledger;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let ledger = open_ledger(&settings.ledger_path(), settings.sheet_name())?;
    let next = next_numbers(&ledger.receipt_numbers()?);
    println!("HSA Account:  {}", next.suggest(PaymentMethod::HsaAccount));
    println!("Credit:       {}", next.suggest(PaymentMethod::Credit));
    Ok(())
}
