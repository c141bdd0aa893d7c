//! Claude Wrapped CLI - yearly usage recaps for Claude Code.
//!
//! Reads local (and optionally remote) usage logs, merges them into one
//! dataset, and renders a shareable year-in-review card.

mod aggregation;
mod cli;
mod collectors;
mod commands;
mod config;
mod data;
mod models;
mod pricing;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
