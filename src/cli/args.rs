//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Draw a Fenwick (binary indexed) tree diagram with Graphviz
#[derive(Parser, Debug)]
#[command(name = "fenwick-diagram")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "FENWICK_DIAGRAM_PROJECT_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub project_dir: Option<PathBuf>,

    /// Without a subcommand the diagram is drawn: viewed, then rendered
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// View the diagram, then render it to the output file
    Draw(DrawArgs),

    /// Print the DOT source to stdout
    Source,

    /// Show the parent/child structure as a tree
    Tree,

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

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawArgs {
    /// Render only, do not open a viewer
    #[arg(long)]
    pub no_view: bool,

    /// Output filename (DOT source; rendered file gets the format extension)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format passed to the engine (pdf, png, svg, ...)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
