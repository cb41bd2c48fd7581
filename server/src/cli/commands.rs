// server/src/cli/commands.rs

// Command-line arguments and subcommands for rxctl.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rxctl")]
#[command(version = "0.1.0")]
#[command(about = "Manage prescriptions issued during appointment slots")]
pub struct CliArgs {
    /// YAML configuration file. Defaults apply when omitted.
    #[arg(long, short = 'c', env = "RX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: RxCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum RxCommand {
    /// Store users, slots and patients from a JSON array of records
    Seed {
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
    /// Create a prescription from a JSON draft
    Create {
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
    /// Replace vitals, lists and relations of a prescription
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
    Get {
        #[arg(long)]
        id: i64,
    },
    /// List every prescription, or those of one user on one day
    List {
        #[arg(long, requires = "date")]
        user_id: Option<i64>,
        /// Day in YYYY-MM-DD form
        #[arg(long, requires = "user_id")]
        date: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}
