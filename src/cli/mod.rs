pub mod init;
pub mod missing;
pub mod new;
pub mod next_id;
pub mod pending;
pub mod read;
pub mod status;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::prompt::{Prompter, TerminalPrompter};

#[derive(Parser)]
#[command(
    name = "hsa-receipts",
    about = "Record HSA receipts in a spreadsheet ledger and file them on the reimbursement portal."
)]
pub struct Cli {
    /// Show debug logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save folders, ledger location and portal login.
    Init(init::InitArgs),
    /// Record new receipts and transactions, then submit them to the portal.
    New {
        /// Only record into the ledger; do not open the portal
        #[arg(long)]
        offline: bool,
    },
    /// Match a local PDF to a ledger row that has no receipt attached yet.
    Missing,
    /// List ledger rows whose receipt has not been uploaded.
    Pending,
    /// Show the next HSA (R) and out-of-pocket (F) receipt numbers.
    NextId,
    /// Print the text extracted from a receipt PDF.
    Read {
        /// Path to the PDF
        file: String,
        /// Also open it in the system PDF viewer
        #[arg(long)]
        open: bool,
    },
    /// Show settings and ledger summary.
    Status,
}

/// No subcommand: ask which workflow to run.
pub fn run_interactive() -> Result<()> {
    let mut prompter = TerminalPrompter;
    loop {
        match prompter
            .ask("Are you entering new transactions? (1 for yes, 0 for no)")?
            .as_str()
        {
            "1" => return new::run(false),
            "0" => return missing::run(),
            _ => println!("Please enter 1 or 0."),
        }
    }
}
