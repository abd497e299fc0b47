//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// flatsync - Manage records in line-oriented system files
#[derive(Parser, Debug)]
#[command(name = "flatsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Kind configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "FLATSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Record kind to manage when no configuration file is given
    #[arg(short, long, global = true, conflicts_with = "config")]
    pub kind: Option<String>,

    /// Default file for --kind (defaults to /etc/<kind>)
    #[arg(short, long, global = true, requires = "kind")]
    pub file: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every record of the kind
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print one attribute of a record
    Get {
        /// Record name
        name: String,

        /// Attribute name (use "ensure" for presence)
        attr: String,
    },

    /// Write attributes, creating the record if it does not exist
    ///
    /// Examples:
    ///   flatsync -k passwd set alice shell=/bin/zsh
    ///   flatsync -k hosts set db ip=10.0.0.5 aliases=db.internal
    ///   flatsync -k passwd set carol uid=1002 gid=1002 --target /etc/passwd.local
    Set {
        /// Record name
        name: String,

        /// Assignments of the form attr=value
        #[arg(required = true)]
        assignments: Vec<String>,

        /// File the record should live in
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Remove a record from its file
    Remove {
        /// Record name
        name: String,

        /// File the record lives in
        #[arg(short, long)]
        target: Option<String>,
    },
}
