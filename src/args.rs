//! Command-line arguments for the `globe` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

#[derive(Debug, Parser)]
#[command(name = "globe", version, about = "Personal relationship manager")]
pub struct Cli {
    /// Config file (default: ./globe.toml, then the user config dir)
    #[arg(long, global = true, env = "GLOBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured path
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive shell (the default)
    Repl,
    /// Serve the JSON api
    Serve {
        /// Address to listen on, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Import a legacy profiles.json file for the first user
    Import { path: PathBuf },
    /// Manage users and their api tokens
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    List,
}
