pub mod chrome;
pub mod form;
#[cfg(test)]
pub mod testing;
pub mod uploader;

use std::path::Path;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::Result;

/// How the portal's elements are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Id(&'static str),
    Name(&'static str),
}

impl Locator {
    pub fn css(&self) -> String {
        match self {
            Locator::Id(id) => format!("#{id}"),
            Locator::Name(name) => format!("[name=\"{name}\"]"),
        }
    }
}

/// Element-level primitives the workflows need from a live portal page.
/// A missing element is an error; nothing here retries.
pub trait Page {
    fn open(&mut self, url: &str) -> Result<()>;
    fn type_text(&mut self, at: Locator, text: &str) -> Result<()>;
    fn click(&mut self, at: Locator) -> Result<()>;
    fn select_text(&mut self, at: Locator, visible_text: &str) -> Result<()>;
    /// Text of the element, or `None` when it is not on the page.
    fn read_text(&mut self, at: Locator) -> Result<Option<String>>;
    /// `src` of every `<img>` in document order.
    fn image_sources(&mut self) -> Result<Vec<String>>;
    fn click_image(&mut self, index: usize) -> Result<()>;
    fn attach_file(&mut self, at: Locator, path: &Path) -> Result<()>;
    fn back(&mut self) -> Result<()>;
    fn pause(&mut self, duration: Duration);
}

pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

pub const LOGIN_EMAIL: Locator = Locator::Id("login_email");
pub const LOGIN_PASSWORD: Locator = Locator::Id("login_pass");
pub const LOGIN_BUTTON: Locator = Locator::Id("login");

pub fn login(page: &mut dyn Page, url: &str, credentials: &Credentials, settle: Duration) -> Result<()> {
    tracing::info!(url, email = %credentials.email, "logging in to portal");
    page.open(url)?;
    page.pause(settle);
    page.type_text(LOGIN_EMAIL, &credentials.email)?;
    page.type_text(LOGIN_PASSWORD, &credentials.password)?;
    page.click(LOGIN_BUTTON)?;
    page.pause(settle);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::testing::{Action, FakePage};
    use super::*;

    #[test]
    fn test_locator_css() {
        assert_eq!(Locator::Id("notes").css(), "#notes");
        assert_eq!(Locator::Name("create_purchase").css(), "[name=\"create_purchase\"]");
    }

    #[test]
    fn test_login_sequence() {
        let mut page = FakePage::new();
        let creds = Credentials {
            email: "me@example.com".into(),
            password: Zeroizing::new("hunter2".into()),
        };
        login(&mut page, "https://portal.test/login", &creds, Duration::ZERO).unwrap();
        assert_eq!(
            page.actions,
            vec![
                Action::Open("https://portal.test/login".into()),
                Action::Type(LOGIN_EMAIL, "me@example.com".into()),
                Action::Type(LOGIN_PASSWORD, "hunter2".into()),
                Action::Click(LOGIN_BUTTON),
            ]
        );
    }
}
