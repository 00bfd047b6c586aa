//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::Order;

/// Build, render and traverse 1-to-N trees
#[derive(Parser, Debug)]
#[command(name = "ntree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug logging (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "NTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a complete tree named by child-index path and traverse it
    Generate {
        /// Levels below the root
        #[arg(long, default_value_t = 2)]
        depth: usize,
        /// Children per node
        #[arg(long, default_value_t = 2)]
        children: usize,
        #[command(flatten)]
        traversal: TraversalArgs,
    },

    /// Traverse the tree described by an outline file
    Traverse {
        /// Outline file (one name per line, indentation nests)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        traversal: TraversalArgs,
        /// Print visited names as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Render an outline file as a tree
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Print a nested JSON snapshot instead
        #[arg(long)]
        json: bool,
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

#[derive(Args, Debug, Clone, Default)]
pub struct TraversalArgs {
    /// Traversal order: breadth-first (bfs) or depth-first (dfs)
    #[arg(short, long)]
    pub order: Option<Order>,

    /// Stop after visiting this many nodes
    #[arg(long)]
    pub stop_after: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}
