//! extman - extension manager for extman hosts
//!
//! Resolves extension references (name, name@version, or a GitHub URL) to
//! distribution metadata, gates them on host compatibility, stages the
//! download in an isolated directory, installs dependencies through an
//! external package manager, and atomically promotes the staged tree into
//! the live extension directory while keeping the installed-extension
//! manifest up to date.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod core;
pub mod error;
pub mod installer;
pub mod manager;
pub mod manifest;
pub mod remote;
pub mod resolver;
pub mod settings;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run extman CLI entrypoint.
pub fn run_cli() {
    // 0. Initialize color settings (must be first)
    ui::init_colors();

    // 1. Signal handling: mark cancellation, batch loops stop between extensions
    ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    })
    .expect("Error setting Ctrl-C handler");

    // 2. Parse & run
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
