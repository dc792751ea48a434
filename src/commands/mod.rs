pub mod install;
pub mod list;
pub mod update;

use crate::core::types::InstallEvent;
use crate::ui as output;

/// Render a progress event to the terminal.
pub(crate) fn print_event(event: &InstallEvent) {
    match event {
        InstallEvent::Message(msg) => output::verbose(msg),
        InstallEvent::DependencyInstallWarning { name, detail } => {
            let detail = if detail.is_empty() {
                "(no stderr)"
            } else {
                detail.as_str()
            };
            output::warning(&format!(
                "Dependency install for '{}' failed, extension kept: {}",
                name, detail
            ));
        }
        InstallEvent::SkippedExistingFile { name, path } => {
            output::warning(&format!(
                "Skipping '{}': '{}' exists and is not a directory",
                name,
                path.display()
            ));
        }
        InstallEvent::SkippedSymlink { name } => {
            output::info(&format!(
                "Skipping '{}': symlinked development install",
                name
            ));
        }
        InstallEvent::UpToDate { name, version } => {
            output::info(&format!("{} is up to date ({})", name, version));
        }
    }
}
