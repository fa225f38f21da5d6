use crate::error::Result;
use crate::portal::chrome::ChromePage;
use crate::portal::{login, Page};
use crate::prompt::TerminalPrompter;
use crate::reconciler::reconcile;
use crate::settings::{load_settings, resolve_credentials};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let mut prompter = TerminalPrompter;
    let outcome = reconcile(&mut prompter, &settings, || {
        let credentials = resolve_credentials(&settings)?;
        let mut page = ChromePage::launch()?;
        login(&mut page, &settings.portal_url, &credentials, settings.settle())?;
        Ok(Box::new(page) as Box<dyn Page>)
    })?;
    tracing::debug!(?outcome, "reconcile finished");
    Ok(())
}
