//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "carehub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Operator toolkit for CareHub field encryption")]
pub struct Cli {
    /// Config file (TOML, YAML or JSON). Defaults to `carehub.*` in the working directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a fresh master key (64 hex characters)
    Keygen {},
    /// Encrypt a single value for a tenant
    Encrypt {
        #[arg(short, long)]
        tenant: String,
        /// Value to encrypt; read from stdin when omitted
        value: Option<String>,
    },
    /// Decrypt a single value for a tenant; plaintext passes through
    Decrypt {
        #[arg(short, long)]
        tenant: String,
        /// Stored value; read from stdin when omitted
        value: Option<String>,
    },
    /// Tell whether a value is an encrypted field value and show its part sizes
    Inspect {
        /// Value to inspect; read from stdin when omitted
        value: Option<String>,
    },
    /// Encrypt the registered fields of a JSON array of records
    Seal {
        #[command(flatten)]
        records: RecordArgs,
    },
    /// Decrypt the registered fields of a JSON array of records
    Open {
        #[command(flatten)]
        records: RecordArgs,
    },
    /// Print the active field registry
    Registry {},
}

#[derive(Debug, clap::Args)]
pub struct RecordArgs {
    /// Entity name as listed by `carehub registry` (e.g. `Resident`)
    #[arg(short, long)]
    pub entity: String,
    /// JSON file holding an array of records
    #[arg(short, long)]
    pub input: PathBuf,
    /// Where to write the result; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
