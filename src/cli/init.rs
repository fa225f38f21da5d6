use clap::Args;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::settings::{load_settings, save_settings, settings_file_exists, shellexpand_path};

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Folder where new receipt PDFs are dropped
    #[arg(long = "receipts-dir")]
    pub receipts_dir: Option<String>,
    /// Folder uploaded receipts are moved to (default: <receipts-dir>/Receipts)
    #[arg(long = "uploaded-dir")]
    pub uploaded_dir: Option<String>,
    /// Path to the .xlsx ledger
    #[arg(long)]
    pub ledger: Option<String>,
    /// Worksheet holding the ledger (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// Portal login page
    #[arg(long)]
    pub url: Option<String>,
    /// Portal login email
    #[arg(long)]
    pub email: Option<String>,
    /// Open receipts in the system PDF viewer while recording (true/false)
    #[arg(long = "open-viewer")]
    pub open_viewer: Option<bool>,
    /// Store the portal password in the OS keychain
    #[arg(long = "store-password")]
    pub store_password: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let first_run = !settings_file_exists();
    let mut settings = load_settings();

    if let Some(dir) = args.receipts_dir {
        settings.receipts_dir = shellexpand_path(&dir);
    } else if first_run {
        let answer = TerminalPrompter.ask(&format!("Receipts folder [{}]", settings.receipts_dir))?;
        if !answer.is_empty() {
            settings.receipts_dir = shellexpand_path(&answer);
        }
    }
    if let Some(dir) = args.uploaded_dir {
        settings.uploaded_dir = Some(shellexpand_path(&dir));
    }
    if let Some(path) = args.ledger {
        settings.ledger_path = shellexpand_path(&path);
    } else if first_run {
        settings.ledger_path = settings
            .receipts_dir()
            .join("transactions.xlsx")
            .to_string_lossy()
            .to_string();
    }
    if let Some(sheet) = args.sheet {
        settings.sheet_name = Some(sheet);
    }
    if let Some(url) = args.url {
        settings.portal_url = url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(open_viewer) = args.open_viewer {
        settings.open_viewer = open_viewer;
    }

    save_settings(&settings)?;
    std::fs::create_dir_all(settings.receipts_dir())?;
    std::fs::create_dir_all(settings.uploaded_dir())?;

    let ledger_path = settings.ledger_path();
    if !ledger_path.exists() {
        if let Some(parent) = ledger_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ledger::create(&ledger_path, settings.sheet_name()).save()?;
        println!("Created ledger {}", ledger_path.display());
    }

    if args.store_password {
        store_password(&settings.email)?;
    }

    println!("Receipts:   {}", settings.receipts_dir().display());
    println!("Uploaded:   {}", settings.uploaded_dir().display());
    println!("Ledger:     {}", ledger_path.display());
    Ok(())
}

#[cfg(feature = "keychain")]
fn store_password(email: &str) -> Result<()> {
    use crate::error::HsaError;
    use crate::settings::store_keychain_password;

    if email.trim().is_empty() {
        return Err(HsaError::Settings("Set --email before storing a password.".into()));
    }
    let password = zeroize::Zeroizing::new(rpassword::prompt_password(format!("Portal password for {email}: "))?);
    store_keychain_password(email, &password)?;
    println!("Password stored in the keychain.");
    Ok(())
}

#[cfg(not(feature = "keychain"))]
fn store_password(_email: &str) -> Result<()> {
    Err(crate::error::HsaError::Settings(
        "This build has no keychain support; use HSA_PORTAL_PASSWORD instead.".into(),
    ))
}
