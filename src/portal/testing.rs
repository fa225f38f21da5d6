use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Locator, Page};
use crate::error::{HsaError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Open(String),
    Type(Locator, String),
    Click(Locator),
    Select(Locator, String),
    ClickImage(usize),
    Attach(Locator, PathBuf),
    Back,
}

/// In-memory portal: a listing page of images, some of which open a record
/// whose `notes` field holds the text stored at claim creation.
#[derive(Default)]
pub struct FakePage {
    pub actions: Vec<Action>,
    pub images: Vec<String>,
    pub notes: HashMap<usize, String>,
    pub missing: Vec<Locator>,
    current: Option<usize>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing with one image per entry; `Some(note)` entries are camera slots.
    pub fn with_records(records: &[Option<&str>]) -> Self {
        let mut page = Self::new();
        for (i, record) in records.iter().enumerate() {
            match record {
                Some(note) => {
                    page.images.push(format!("https://portal.test/img/camera.png?r={i}"));
                    page.notes.insert(i, note.to_string());
                }
                None => page.images.push(format!("https://portal.test/img/logo{i}.png")),
            }
        }
        page
    }

    fn check(&self, at: Locator) -> Result<()> {
        if self.missing.contains(&at) {
            return Err(HsaError::Other(format!("no such element: {}", at.css())));
        }
        Ok(())
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Click(l) => Some(*l),
                _ => None,
            })
            .collect()
    }
}

impl Page for FakePage {
    fn open(&mut self, url: &str) -> Result<()> {
        self.actions.push(Action::Open(url.to_string()));
        Ok(())
    }

    fn type_text(&mut self, at: Locator, text: &str) -> Result<()> {
        self.check(at)?;
        self.actions.push(Action::Type(at, text.to_string()));
        Ok(())
    }

    fn click(&mut self, at: Locator) -> Result<()> {
        self.check(at)?;
        self.actions.push(Action::Click(at));
        match at {
            Locator::Name("update_purchase") => {
                if let Some(i) = self.current {
                    self.images[i] = format!("https://portal.test/img/receipt{i}.png");
                }
            }
            Locator::Name("exit_edit") => self.current = None,
            _ => {}
        }
        Ok(())
    }

    fn select_text(&mut self, at: Locator, visible_text: &str) -> Result<()> {
        self.check(at)?;
        self.actions.push(Action::Select(at, visible_text.to_string()));
        Ok(())
    }

    fn read_text(&mut self, at: Locator) -> Result<Option<String>> {
        if at != Locator::Id("notes") {
            return Ok(None);
        }
        Ok(self.current.and_then(|i| self.notes.get(&i).cloned()))
    }

    fn image_sources(&mut self) -> Result<Vec<String>> {
        Ok(self.images.clone())
    }

    fn click_image(&mut self, index: usize) -> Result<()> {
        if index >= self.images.len() {
            return Err(HsaError::Other(format!("no image at {index}")));
        }
        self.actions.push(Action::ClickImage(index));
        self.current = Some(index);
        Ok(())
    }

    fn attach_file(&mut self, at: Locator, path: &Path) -> Result<()> {
        self.check(at)?;
        self.actions.push(Action::Attach(at, path.to_path_buf()));
        Ok(())
    }

    fn back(&mut self) -> Result<()> {
        self.actions.push(Action::Back);
        self.current = None;
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) {}
}
