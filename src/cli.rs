//! Command-line definitions for the `qrboot` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    name = "qrboot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Prepares the QR service's directories and database, then execs the server."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the bootstrap sequence, then replace this process with the server command
    Run {
        /// Server command and its arguments
        #[clap(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        server: Vec<String>,
    },
    /// Create tables, apply migrations and seed the default account
    InitDb,
    /// Add a user unless one with the same name exists
    AddUser {
        username: String,
        password: String,
        /// Grant administrative rights
        #[clap(long)]
        admin: bool,
    },
    /// Add missing columns to an existing database
    Migrate,
}
