use crate::error::Result;
use crate::reconciler::pending_table;
use crate::recorder::open_ledger;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let ledger = open_ledger(&settings.ledger_path(), settings.sheet_name())?;
    let pending = ledger.pending()?;
    if pending.is_empty() {
        println!("No receipts pending upload.");
        return Ok(());
    }
    println!("{}", pending_table(&pending));
    println!("{} receipt(s) pending.", pending.len());
    Ok(())
}
