//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::error::Result;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    match &args.command {
        Command::Install { references } => commands::install::run(commands::install::InstallOptions {
            references: references.clone(),
        }),

        Command::Update { names, uri } => commands::update::run(commands::update::UpdateOptions {
            names: names.clone(),
            uri: uri.clone(),
        }),

        Command::List => commands::list::run(),
    }
}
