//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::{ArrowType, Color};

/// Tree diagram editor: build, restyle and export labeled trees
#[derive(Parser, Debug)]
#[command(name = "treedraw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Data file holding the tree (overrides config)
    #[arg(short = 'f', long, global = true, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// Additional config file, applied after the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start over with a single-node tree
    New {
        /// Root label (default from config)
        #[arg(long)]
        value: Option<String>,
    },

    /// Print the tree
    Show,

    /// Append a child node
    Add {
        /// Parent node id
        parent: u64,
        /// Label of the new node
        #[arg(default_value = "new")]
        value: String,
    },

    /// Delete a node and its subtree
    Remove {
        /// Node id
        id: u64,
    },

    /// Mirror a subtree
    Invert {
        /// Node id
        id: u64,
    },

    /// Rotate the node's sibling row: first sibling moves to the end
    ShiftLeft {
        /// Node id
        id: u64,
    },

    /// Rotate the node's sibling row: last sibling moves to the front
    ShiftRight {
        /// Node id
        id: u64,
    },

    /// Change node attributes (unspecified fields are kept)
    Update {
        /// Node id
        id: u64,
        #[command(flatten)]
        attributes: AttributeArgs,
    },

    /// Print nodes level by level
    Levels {
        /// Start node (default: root)
        id: Option<u64>,
    },

    /// Replace the tree with a random one
    Random {
        /// Number of nodes (default from config)
        size: Option<usize>,
    },

    /// Write the tree document as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Replace the tree with a JSON tree document
    Import {
        /// Tree document file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage canvas settings stored with the tree
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Manage configuration
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

#[derive(clap::Args, Debug, Default)]
pub struct AttributeArgs {
    /// Node label
    #[arg(long)]
    pub value: Option<String>,

    /// Fill color (#RRGGBB)
    #[arg(long)]
    pub background_color: Option<Color>,

    /// Label color (#RRGGBB)
    #[arg(long)]
    pub text_color: Option<Color>,

    /// Node width
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Node height
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Edge color (#RRGGBB)
    #[arg(long)]
    pub line_color: Option<Color>,

    /// Draw the edge dashed
    #[arg(long)]
    pub dashed: Option<bool>,

    /// Arrowheads: none, to, from, both
    #[arg(long)]
    pub arrow: Option<ArrowType>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show tree settings
    Show,

    /// Change tree settings (unspecified fields are kept)
    Set {
        /// Canvas background (#RRGGBB)
        #[arg(long)]
        background_color: Option<Color>,
        /// Fit nodes to their labels
        #[arg(long)]
        node_resize: Option<bool>,
        /// Distance between levels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        level_height: Option<u32>,
        /// Gap between siblings
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        sibling_space: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template (or write it to the global config path)
    Init {
        /// Write the global config file
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
