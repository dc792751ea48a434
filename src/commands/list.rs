//! List command

use crate::error::Result;
use crate::manager::ExtensionManager;
use crate::remote::HttpFetcher;
use crate::settings::Settings;
use crate::ui as output;

pub fn run() -> Result<()> {
    let settings = Settings::load()?;
    let fetcher = HttpFetcher::new()?;
    let manager = ExtensionManager::new(&settings, &fetcher);

    let extensions = manager.installed_extensions()?;
    if extensions.is_empty() {
        output::info("No extensions installed.");
        return Ok(());
    }

    output::header("Installed extensions");
    for extension in &extensions {
        let version = extension.version.as_deref().unwrap_or("unknown");
        let marker = if extension.development { " (dev)" } else { "" };
        output::indent(&format!("{} {}{}", extension.name, version, marker), 1);
    }

    Ok(())
}
