//! Wrapped command - generate the yearly card and print the recap.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Local};

use crate::aggregation::{self, WrappedStats};
use crate::collectors::{local, remote, HostProgress};
use crate::config;
use crate::visualization::{export_card_png, export_card_svg, open_file, print_summary};


/// Run the wrapped command.
pub fn run(
    year: Option<i32>,
    remotes: &[String],
    jobs: usize,
    svg: bool,
    output: Option<String>,
    should_open: bool,
    text_only: bool,
) -> Result<()> {
    let year = year.unwrap_or_else(|| Local::now().year());

    let Some(stats) = gather_stats(year, remotes, jobs) else {
        println!("No Claude Code activity found for {year}.");
        return Ok(());
    };

    if !text_only {
        let format_type = if svg { "svg" } else { "png" };
        let output_path = if let Some(path) = output {
            PathBuf::from(path)
        } else {
            let default_dir = config::default_output_dir();
            std::fs::create_dir_all(&default_dir)?;
            default_dir.join(format!("claude-wrapped-{year}.{format_type}"))
        };

        println!("Exporting to {}...", format_type.to_uppercase());
        if svg {
            export_card_svg(&stats, &output_path)?;
        } else {
            export_card_png(&stats, &output_path)?;
        }
        println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());

        if should_open {
            println!("Opening {}...", format_type.to_uppercase());
            open_file(&output_path)?;
        }
    }

    print_summary(&stats);

    Ok(())
}


/// Collect, merge, and compute the yearly stats.
///
/// Returns None when the year has no recorded activity at all.
pub(crate) fn gather_stats(
    year: i32,
    remotes: &[String],
    jobs: usize,
) -> Option<WrappedStats> {
    println!("Collecting local usage data...");
    let local_dataset = local::collect(Some(year));

    let remote_datasets = remote::fetch_hosts(remotes, Some(year), jobs, |event| match event {
        HostProgress::Started(host) => println!("Fetching from {host}..."),
        HostProgress::Done(host) => println!("  {host}: done"),
        HostProgress::Failed(host, reason) => eprintln!("Warning: Skipping {host}: {reason}"),
    });

    let merged = aggregation::merge(local_dataset, remote_datasets);
    let stats = aggregation::compute(year, &merged);

    if stats.totals.sessions == 0 && stats.totals.prompts == 0 {
        return None;
    }

    Some(stats)
}
