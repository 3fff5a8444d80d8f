//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build, persist, inspect and convert binary trees stored in hierarchical container files
#[derive(Parser, Debug)]
#[command(name = "bintree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "BINTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Without a subcommand the interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show max of internal nodes and draw the tree
    Inspect {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show max value among internal nodes
    Max {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Generate a random tree and save it
    Generate {
        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,
        /// Target tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Build a tree from keyboard input (values and child choices)
    Input {
        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,
        /// Target tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Build a tree from a flat list of numbers
    List {
        /// Number of nodes (default: number of imported values)
        #[arg(short, long, required_unless_present = "from")]
        nodes: Option<usize>,
        /// Read values from a text file (one per line) instead of prompting
        #[arg(long, value_hint = ValueHint::FilePath)]
        from: Option<PathBuf>,
        /// Target tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Write all node values to a text file, one per line (pre-order)
    Convert {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
        /// Target text file
        #[arg(value_hint = ValueHint::FilePath)]
        text: PathBuf,
    },

    /// Interactive menu
    Menu,

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
