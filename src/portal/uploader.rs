use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Locator, Page};
use crate::error::{HsaError, Result};
use crate::receipts::move_to_uploaded;

pub const NOTES: Locator = Locator::Id("notes");
pub const IMAGE_INPUT: Locator = Locator::Id("image");
pub const IMAGE_DESCRIPTION: Locator = Locator::Id("img_description");
pub const UPLOAD: Locator = Locator::Name("upload_image");
pub const SAVE: Locator = Locator::Name("update_purchase");
pub const EXIT: Locator = Locator::Name("exit_edit");

const CAMERA_IMAGE: &str = "camera.png";
const IMAGE_DESCRIPTION_TEXT: &str = "This is a receipt PDF.";

/// The portal renders `camera.png` for records that have no image yet.
pub fn is_camera_image(src: &str) -> bool {
    let path = src.split(&['?', '#'][..]).next().unwrap_or(src);
    path.rsplit('/').next() == Some(CAMERA_IMAGE)
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Attached to the `slot`-th camera image; the file now lives at `destination`.
    Uploaded { slot: usize, destination: PathBuf },
    /// Every camera slot was opened and none carried the expected note.
    NoMatch,
}

pub struct ReceiptUploader<'a> {
    page: &'a mut dyn Page,
    source_dir: PathBuf,
    uploaded_dir: PathBuf,
    settle: Duration,
}

impl<'a> ReceiptUploader<'a> {
    pub fn new(page: &'a mut dyn Page, source_dir: &Path, uploaded_dir: &Path, settle: Duration) -> Self {
        Self {
            page,
            source_dir: source_dir.to_path_buf(),
            uploaded_dir: uploaded_dir.to_path_buf(),
            settle,
        }
    }

    /// Walk the camera slots in order, opening each record until one whose
    /// note equals `file_name`, then attach the local file there.
    pub fn upload(&mut self, file_name: &str) -> Result<UploadOutcome> {
        let local = self.source_dir.join(file_name);
        if !local.is_file() {
            return Err(HsaError::ReceiptFileMissing(local.display().to_string()));
        }

        let mut slot = 0;
        loop {
            let sources = self.page.image_sources()?;
            let Some(index) = sources
                .iter()
                .enumerate()
                .filter(|(_, src)| is_camera_image(src))
                .map(|(i, _)| i)
                .nth(slot)
            else {
                tracing::warn!(file_name, checked = slot, "no camera slot matched receipt");
                return Ok(UploadOutcome::NoMatch);
            };

            self.page.click_image(index)?;
            self.page.pause(self.settle);
            let note = self.page.read_text(NOTES)?.unwrap_or_default();
            tracing::debug!(slot, note = %note.trim(), expected = file_name, "checking camera slot");

            if note.trim() == file_name {
                self.attach(&local)?;
                self.page.click(SAVE)?;
                self.page.click(EXIT)?;
                let destination = move_to_uploaded(&self.source_dir, &self.uploaded_dir, file_name)?;
                tracing::info!(file_name, slot, "uploaded receipt");
                return Ok(UploadOutcome::Uploaded { slot, destination });
            }

            self.page.back()?;
            self.page.pause(self.settle);
            slot += 1;
        }
    }

    fn attach(&mut self, local: &Path) -> Result<()> {
        let absolute = std::fs::canonicalize(local)?;
        self.page.attach_file(IMAGE_INPUT, &absolute)?;
        self.page.type_text(IMAGE_DESCRIPTION, IMAGE_DESCRIPTION_TEXT)?;
        self.page.click(UPLOAD)
    }
}
