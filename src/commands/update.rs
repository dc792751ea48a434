//! Update command
//!
//! Checks named extensions (or every installed one) against the registry
//! and reinstalls those with a newer resolvable version. Symlinked
//! development installs are reported and left alone.

use crate::error::{ExtmanError, Result};
use crate::manager::ExtensionManager;
use crate::remote::HttpFetcher;
use crate::settings::Settings;
use crate::ui as output;

#[derive(Debug)]
pub struct UpdateOptions {
    /// Extensions to check; empty means all installed
    pub names: Vec<String>,
    /// Resolve from this source-repository URL instead of the registry
    pub uri: Option<String>,
}

pub fn run(options: UpdateOptions) -> Result<()> {
    if options.uri.is_some() && options.names.len() != 1 {
        return Err(ExtmanError::ConfigError(
            "--uri requires exactly one extension name".to_string(),
        ));
    }

    let settings = Settings::load()?;
    let fetcher = HttpFetcher::new()?;
    let manager = ExtensionManager::new(&settings, &fetcher);

    let names: Vec<String> = if options.names.is_empty() {
        manager
            .installed_extensions()?
            .into_iter()
            .map(|e| e.name)
            .collect()
    } else {
        options.names
    };

    if names.is_empty() {
        output::info("No extensions installed.");
        return Ok(());
    }

    let mut updated = 0usize;
    let mut failed = 0usize;

    for name in &names {
        if output::is_interrupted() {
            return Err(ExtmanError::Interrupted);
        }

        match manager.check_update(name, options.uri.as_deref(), &super::print_event) {
            Ok(true) => {
                updated += 1;
                output::success(&format!("Updated {}", name));
            }
            Ok(false) => {}
            Err(e) => {
                output::error(&format!("{}: {}", name, e));
                failed += 1;
            }
        }
    }

    output::info(&format!("{} of {} extensions updated", updated, names.len()));

    if failed > 0 {
        Err(ExtmanError::Other(format!(
            "{} of {} update checks failed",
            failed,
            names.len()
        )))
    } else {
        Ok(())
    }
}
