//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Assemble, inspect and merge CGNS-style trees
#[derive(Parser, Debug)]
#[command(name = "cgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config (default: ./.cgtree.toml)
    #[arg(short, long, global = true, env = "CGTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the path of every node of the assembled tree
    Paths {
        /// Input files or directories of stored trees
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
        /// Only print paths matching this regular expression
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Print the assembled tree
    Show {
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
    },

    /// Assemble inputs into one tree and save it
    Merge {
        #[arg(value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
        /// Put the zones of FILE into base BASE
        #[arg(short, long, value_name = "BASE=FILE")]
        group: Vec<String>,
        /// Output file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// List the zones of the assembled tree
    Zones {
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
    },

    /// List the bases of the assembled tree
    Bases {
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
    },

    /// Print one node of a stored tree
    Node {
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Node path, e.g. CGNSTree/Base/Zone
        path: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Write a commented config template
    Init {
        /// Write to the global config file instead of ./.cgtree.toml
        #[arg(short, long)]
        global: bool,
    },
    /// Show config file locations
    Path,
}
