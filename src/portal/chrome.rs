use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::json;

use super::{Locator, Page};
use crate::error::{HsaError, Result};

// The session sits idle while the user answers prompts.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

const SELECT_BY_TEXT: &str = r#"function(text) {
    for (const option of this.options) {
        if (option.text.trim() === text) {
            this.value = option.value;
            this.dispatchEvent(new Event('change', { bubbles: true }));
            return true;
        }
    }
    return false;
}"#;

const ELEMENT_TEXT: &str = "function() { return this.value || this.innerText || ''; }";

/// A visible Chrome window driven over the DevTools protocol.
pub struct ChromePage {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn launch() -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(false)
            .window_size(Some((1400, 1000)))
            .idle_browser_timeout(IDLE_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("invalid browser options: {e}"))?;
        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        tracing::debug!("browser launched");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn element(&self, at: Locator) -> Result<Element<'_>> {
        Ok(self.tab.wait_for_element(&at.css())?)
    }

    fn images(&self) -> Vec<Element<'_>> {
        self.tab.find_elements("img").unwrap_or_default()
    }
}

impl Page for ChromePage {
    fn open(&mut self, url: &str) -> Result<()> {
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn type_text(&mut self, at: Locator, text: &str) -> Result<()> {
        tracing::debug!(element = %at.css(), "typing");
        self.element(at)?.type_into(text)?;
        Ok(())
    }

    fn click(&mut self, at: Locator) -> Result<()> {
        tracing::debug!(element = %at.css(), "clicking");
        self.element(at)?.click()?;
        Ok(())
    }

    fn select_text(&mut self, at: Locator, visible_text: &str) -> Result<()> {
        let result = self
            .element(at)?
            .call_js_fn(SELECT_BY_TEXT, vec![json!(visible_text)], false)?;
        if result.value != Some(json!(true)) {
            return Err(HsaError::Other(format!(
                "option '{visible_text}' not found in {}",
                at.css()
            )));
        }
        Ok(())
    }

    fn read_text(&mut self, at: Locator) -> Result<Option<String>> {
        let Ok(element) = self.tab.find_element(&at.css()) else {
            return Ok(None);
        };
        let result = element.call_js_fn(ELEMENT_TEXT, vec![], false)?;
        Ok(result.value.and_then(|v| v.as_str().map(str::to_string)))
    }

    fn image_sources(&mut self) -> Result<Vec<String>> {
        let mut sources = Vec::new();
        for image in self.images() {
            sources.push(image.get_attribute_value("src")?.unwrap_or_default());
        }
        Ok(sources)
    }

    fn click_image(&mut self, index: usize) -> Result<()> {
        let images = self.images();
        let image = images
            .get(index)
            .ok_or_else(|| HsaError::Other(format!("image {index} is no longer on the page")))?;
        image.click()?;
        Ok(())
    }

    fn attach_file(&mut self, at: Locator, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.element(at)?.set_input_files(&[path.as_ref()])?;
        Ok(())
    }

    fn back(&mut self) -> Result<()> {
        self.tab.evaluate("history.back()", false)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
