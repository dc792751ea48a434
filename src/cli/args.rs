use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "extman",
    about = "Extension manager for extman hosts",
    long_about = "Install and update host extensions from an npm-style registry or GitHub, \
                  with staged atomic promotion into the live extension tree",
    version,
    arg_required_else_help = true,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install one or more extensions
    Install {
        /// Extension references: name, name@version, or a GitHub URL
        #[arg(required = true, value_name = "REF")]
        references: Vec<String>,
    },

    /// Check installed extensions for updates and install them
    Update {
        /// Extensions to check (all installed when omitted)
        #[arg(value_name = "NAME")]
        names: Vec<String>,

        /// Resolve a single extension from this source-repository URL
        /// instead of the registry
        #[arg(long, value_name = "URL")]
        uri: Option<String>,
    },

    /// List installed extensions
    List,
}
