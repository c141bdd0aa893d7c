//! CLI definitions using clap.

use clap::{Parser, Subcommand};

use crate::commands;


/// Claude Wrapped - CLI for Claude Code yearly usage recaps
#[derive(Parser)]
#[command(name = "ccw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Generate the yearly wrapped card and print the recap
    Wrapped {
        /// Year to summarize (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Remote host to include (repeatable), reached over non-interactive SSH
        #[arg(long = "remote", value_name = "HOST")]
        remote: Vec<String>,

        /// Number of remote hosts to fetch in parallel
        #[arg(long, default_value_t = 1)]
        jobs: usize,

        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Open file after export
        #[arg(long)]
        open: bool,

        /// Skip the card, print the text recap only
        #[arg(long)]
        text: bool,
    },

    /// Print the yearly recap without rendering a card
    Summary {
        /// Year to summarize (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Remote host to include (repeatable), reached over non-interactive SSH
        #[arg(long = "remote", value_name = "HOST")]
        remote: Vec<String>,

        /// Number of remote hosts to fetch in parallel
        #[arg(long, default_value_t = 1)]
        jobs: usize,
    },
}


/// Run the CLI. Bare invocation generates the current year's card.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Wrapped { year, remote, jobs, svg, output, open, text }) => {
            commands::wrapped::run(year, &remote, jobs, svg, output, open, text)
        }
        Some(Commands::Summary { year, remote, jobs }) => {
            commands::summary::run(year, &remote, jobs)
        }
        None => commands::wrapped::run(None, &[], 1, false, None, false, false),
    }
}
