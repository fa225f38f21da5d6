use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{HsaError, Result};
use crate::portal::Credentials;

pub const EMAIL_ENV: &str = "HSA_PORTAL_EMAIL";
pub const PASSWORD_ENV: &str = "HSA_PORTAL_PASSWORD";
#[cfg(feature = "keychain")]
const KEYCHAIN_SERVICE: &str = "hsa-receipts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub receipts_dir: String,
    /// Where uploaded receipts end up (default: `<receipts_dir>/Receipts`).
    #[serde(default)]
    pub uploaded_dir: Option<String>,
    pub ledger_path: String,
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Open each receipt in the system PDF viewer while asking about it.
    #[serde(default = "default_open_viewer")]
    pub open_viewer: bool,
}

fn default_portal_url() -> String {
    "https://trackhsa.com/login".to_string()
}

fn default_step_delay_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_open_viewer() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        let base = default_base_dir();
        Self {
            receipts_dir: base.to_string_lossy().to_string(),
            uploaded_dir: None,
            ledger_path: base.join("transactions.xlsx").to_string_lossy().to_string(),
            sheet_name: None,
            portal_url: default_portal_url(),
            email: String::new(),
            step_delay_ms: default_step_delay_ms(),
            settle_ms: default_settle_ms(),
            open_viewer: default_open_viewer(),
        }
    }
}

impl Settings {
    pub fn receipts_dir(&self) -> PathBuf {
        PathBuf::from(&self.receipts_dir)
    }

    pub fn uploaded_dir(&self) -> PathBuf {
        match &self.uploaded_dir {
            Some(dir) => PathBuf::from(dir),
            None => self.receipts_dir().join("Receipts"),
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        PathBuf::from(&self.ledger_path)
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_base_dir() -> PathBuf {
    home().join("Documents").join("HSA")
}

/// `~/.config/hsa-receipts/settings.json`
pub fn settings_path() -> PathBuf {
    home().join(".config").join("hsa-receipts").join("settings.json")
}

pub fn settings_file_exists() -> bool {
    settings_path().is_file()
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing file means defaults; an unreadable one is reported and ignored.
fn load_settings_from(path: &Path) -> Settings {
    let parsed = match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|e| e.to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => Err(e.to_string()),
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut json = serde_json::to_string_pretty(settings).map_err(|e| HsaError::Settings(e.to_string()))?;
    json.push('\n');
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "saved settings");
    Ok(())
}

/// Expand a leading `~`, then make the path absolute when it already exists.
pub fn shellexpand_path(path: &str) -> String {
    let expanded = match path.strip_prefix('~') {
        Some(rest) => home().join(rest.trim_start_matches(&['/', '\\'][..])),
        None => PathBuf::from(path),
    };
    std::fs::canonicalize(&expanded)
        .unwrap_or(expanded)
        .to_string_lossy()
        .to_string()
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(feature = "keychain")]
fn keychain_password(email: &str) -> Option<Zeroizing<String>> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, email).ok()?;
    match entry.get_password() {
        Ok(pw) => Some(Zeroizing::new(pw)),
        Err(e) => {
            tracing::debug!(error = %e, "no keychain password");
            None
        }
    }
}

#[cfg(not(feature = "keychain"))]
fn keychain_password(_email: &str) -> Option<Zeroizing<String>> {
    None
}

#[cfg(feature = "keychain")]
pub fn store_keychain_password(email: &str, password: &str) -> Result<()> {
    keyring::Entry::new(KEYCHAIN_SERVICE, email)
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| HsaError::Settings(format!("keychain: {e}")))
}

/// Email from the environment or settings; password from the environment,
/// the OS keychain, or an echo-less prompt, in that order.
pub fn resolve_credentials(settings: &Settings) -> Result<Credentials> {
    let email = env_nonempty(EMAIL_ENV)
        .unwrap_or_else(|| settings.email.clone());
    if email.trim().is_empty() {
        return Err(HsaError::Settings(format!(
            "No portal email configured. Run `hsa-receipts init --email …` or set {EMAIL_ENV}."
        )));
    }

    let password = match env_nonempty(PASSWORD_ENV) {
        Some(pw) => Zeroizing::new(pw),
        None => match keychain_password(&email) {
            Some(pw) => pw,
            None => Zeroizing::new(
                rpassword::prompt_password(format!("Portal password for {email}: "))?,
            ),
        },
    };
    Ok(Credentials { email, password })
}
