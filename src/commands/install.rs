//! Install command
//!
//! Resolves, gates, stages and promotes each requested extension. One
//! extension's failure is reported and the batch moves on; the command fails
//! at the end if anything failed.

use crate::error::{ExtmanError, Result};
use crate::manager::ExtensionManager;
use crate::remote::HttpFetcher;
use crate::settings::Settings;
use crate::ui as output;

#[derive(Debug)]
pub struct InstallOptions {
    /// Extension references: `name`, `name@version`, or a GitHub URL
    pub references: Vec<String>,
}

pub fn run(options: InstallOptions) -> Result<()> {
    let settings = Settings::load()?;
    let fetcher = HttpFetcher::new()?;
    let manager = ExtensionManager::new(&settings, &fetcher);

    let total = options.references.len();
    let mut failed = 0usize;

    for reference in &options.references {
        if output::is_interrupted() {
            return Err(ExtmanError::Interrupted);
        }

        output::info(&format!("Installing {}...", reference));
        match manager.install(reference, &super::print_event) {
            Ok(true) => output::success(&format!("Installed {}", reference)),
            Ok(false) => {}
            Err(e) => {
                output::error(&format!("{}: {}", reference, e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        Err(ExtmanError::Other(format!(
            "{} of {} installs failed",
            failed, total
        )))
    } else {
        Ok(())
    }
}
