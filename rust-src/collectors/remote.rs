//! Remote host collector.
//!
//! Fetches the same artifacts as the local collector over non-interactive
//! SSH. One command runs per artifact; stdout is parsed exactly like the
//! corresponding local file. A missing remote file yields an absent artifact,
//! an unreachable host is skipped, and neither fails the batch.

use std::collections::BTreeSet;
use std::process::Command;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;

use crate::aggregation::combine_caches;
use crate::config::{self, OLDEST_SCAN_LINES, SSH_CONNECT_TIMEOUT_SECS, SUBAGENT_PREFIX};
use crate::data::{self, Fetched};
use crate::models::{HistoryEntry, UsageCache};


/// Everything one remote host knows about usage.
#[derive(Debug, Clone, Default)]
pub struct RemoteDataset {
    pub host: String,
    pub cache: Option<UsageCache>,
    pub history: Vec<HistoryEntry>,
    pub projects: BTreeSet<String>,
    pub oldest_timestamp: Option<DateTime<Utc>>,
}


/// Transport-level failure. Per-artifact absence is not an error.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to run ssh: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("connection to {host} failed")]
    Unreachable { host: String },
}


/// Per-host progress reporting.
#[derive(Debug, Clone)]
pub enum HostProgress {
    Started(String),
    Done(String),
    Failed(String, String),
}


/// Fetch all hosts through a bounded worker pool.
///
/// Width 1 keeps the transport load of the historical one-host-at-a-time
/// behavior; a failing host is reported and excluded from the results.
pub fn fetch_hosts(
    hosts: &[String],
    year: Option<i32>,
    jobs: usize,
    progress: impl Fn(HostProgress) + Sync,
) -> Vec<RemoteDataset> {
    if hosts.is_empty() {
        return Vec::new();
    }

    let fetch_all = || {
        hosts
            .par_iter()
            .filter_map(|host| {
                progress(HostProgress::Started(host.clone()));
                match fetch_host(host, year) {
                    Ok(dataset) => {
                        progress(HostProgress::Done(host.clone()));
                        Some(dataset)
                    }
                    Err(e) => {
                        progress(HostProgress::Failed(host.clone(), e.to_string()));
                        None
                    }
                }
            })
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
    {
        Ok(pool) => pool.install(fetch_all),
        Err(_) => fetch_all(),
    }
}


/// Fetch one host's dataset. Steps run sequentially to bound the load on the
/// transport; project names come from the fetched history rather than an
/// extra round-trip.
fn fetch_host(host: &str, year: Option<i32>) -> Result<RemoteDataset, RemoteError> {
    let roots = config::remote_storage_roots();

    let mut cache: Option<UsageCache> = None;
    for root in &roots {
        if let Some(stdout) = run_remote(host, &cache_command(root))? {
            match data::parse_cache(&stdout) {
                Fetched::Found(fetched) => {
                    cache = Some(match cache.take() {
                        Some(acc) => combine_caches(acc, &fetched),
                        None => fetched,
                    });
                }
                Fetched::Missing => {}
                Fetched::Invalid(e) => {
                    eprintln!("Warning: Skipping unreadable usage cache on {host}: {e}");
                }
            }
        }
    }

    let history = run_remote(host, &history_command(&roots))?
        .map(|stdout| data::parse_history(&stdout, year))
        .unwrap_or_default();

    let projects = data::project_names(&history);

    let oldest_timestamp = run_remote(host, &oldest_command(&roots))?
        .and_then(|stdout| data::oldest_timestamp_in_text(&stdout));

    Ok(RemoteDataset {
        host: host.to_string(),
        cache,
        history,
        projects,
        oldest_timestamp,
    })
}


fn cache_command(root: &str) -> String {
    format!("cat {root}/usage-cache.json")
}


fn history_command(roots: &[String]) -> String {
    let paths: Vec<String> = roots.iter().map(|root| format!("{root}/history.jsonl")).collect();
    format!("cat {} 2>/dev/null || true", paths.join(" "))
}


fn oldest_command(roots: &[String]) -> String {
    let dirs: Vec<String> = roots.iter().map(|root| format!("{root}/projects")).collect();
    format!(
        "find {} -name '*.jsonl' ! -name '{}*' -exec head -n {} {{}} \\; 2>/dev/null || true",
        dirs.join(" "),
        SUBAGENT_PREFIX,
        OLDEST_SCAN_LINES
    )
}


/// Run one command against a host over non-interactive SSH.
///
/// Ok(None) means the command ran but the artifact is absent (nonzero exit);
/// exit 255 is the SSH client reporting a transport failure.
fn run_remote(host: &str, command: &str) -> Result<Option<String>, RemoteError> {
    let output = Command::new("ssh")
        .arg("-o")
        .arg("BatchMode=yes")
        .arg("-o")
        .arg(format!("ConnectTimeout={SSH_CONNECT_TIMEOUT_SECS}"))
        .arg(host)
        .arg(command)
        .output()?;

    if output.status.success() {
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    } else if output.status.code() == Some(255) {
        Err(RemoteError::Unreachable {
            host: host.to_string(),
        })
    } else {
        Ok(None)
    }
}
