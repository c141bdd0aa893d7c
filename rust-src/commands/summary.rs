//! Summary command - text recap without rendering a card.

use anyhow::Result;
use chrono::{Datelike, Local};

use crate::visualization::print_summary;


/// Run the summary command.
pub fn run(year: Option<i32>, remotes: &[String], jobs: usize) -> Result<()> {
    let year = year.unwrap_or_else(|| Local::now().year());

    match super::wrapped::gather_stats(year, remotes, jobs) {
        Some(stats) => print_summary(&stats),
        None => println!("No Claude Code activity found for {year}."),
    }

    Ok(())
}
