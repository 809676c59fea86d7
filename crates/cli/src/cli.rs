// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line flags and their resolution into run settings.

use crate::config::FileConfig;
use crate::env;
use anyhow::{Context, Result};
use clap::Parser;
use foreman_engine::cgroup::{DEFAULT_CGROUP_NAME, DEFAULT_CGROUP_ROOT};
use foreman_engine::{Cgroup, SupervisorConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Memory left to the host when no limit is given.
const HOST_RESERVE_MIB: u64 = 64;

/// Memory left to the supervisor itself inside the limit.
const SUPERVISOR_RESERVE_MIB: u64 = 128;

#[derive(Debug, Parser)]
#[command(
    name = "foreman",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Run solver and rewriter programs against problems under a time limit"
)]
pub struct Cli {
    /// Problem JSON file (repeatable)
    #[arg(short = 'f', long = "problem", required = true)]
    pub problems: Vec<PathBuf>,

    /// Power phrase passed to solvers and the rewriter (repeatable)
    #[arg(short = 'p', long = "powerphrase")]
    pub phrases: Vec<String>,

    /// File with one power phrase per line, used when no -p is given
    #[arg(long)]
    pub phrases_file: Option<PathBuf>,

    /// Number of CPU cores (default: all available)
    #[arg(short = 'c', long)]
    pub cores: Option<usize>,

    /// Time limit in seconds (default: 24 hours)
    #[arg(short = 't', long = "timelimit")]
    pub time_limit: Option<u64>,

    /// Memory limit in MiB (default: free memory less 64)
    #[arg(short = 'm', long = "memlimit")]
    pub mem_limit: Option<u64>,

    /// Run workers without a cgroup
    #[arg(long)]
    pub disable_cgroup: bool,

    /// JSON array of known solutions competing with this run's results
    #[arg(long)]
    pub prior: Option<PathBuf>,

    /// Quick solver program (repeatable)
    #[arg(long = "quick-solver")]
    pub quick_solvers: Vec<String>,

    /// Heavy solver program (repeatable)
    #[arg(long = "heavy-solver")]
    pub heavy_solvers: Vec<String>,

    /// Extra solver program, run after everything else (repeatable)
    #[arg(long = "extra-solver")]
    pub extra_solvers: Vec<String>,

    /// Rewriter program
    #[arg(long)]
    pub rewriter: Option<String>,

    /// Program every solver is run through
    #[arg(long)]
    pub solver_wrapper: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log every task's score and the per-problem average
    #[arg(long)]
    pub show_scores: bool,

    /// Omit fields starting with `_` from the output
    #[arg(long)]
    pub strip_extra_fields: bool,
}

/// Everything a run needs, after flags, file and environment are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub problems: Vec<PathBuf>,
    pub prior: Option<PathBuf>,
    pub cores: usize,
    pub time_limit: Duration,
    /// MiB.
    pub mem_limit: u64,
    pub supervisor: SupervisorConfig,
    pub show_scores: bool,
    pub strip_extra_fields: bool,
}

impl Settings {
    /// Ceiling written to the cgroup, in bytes.
    pub fn worker_memory_bytes(&self) -> u64 {
        self.mem_limit.saturating_sub(SUPERVISOR_RESERVE_MIB).max(1) * 1024 * 1024
    }
}

fn first_non_empty(flags: Vec<String>, file: Vec<String>) -> Vec<String> {
    if flags.is_empty() {
        file
    } else {
        flags
    }
}

fn read_phrases(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read phrases {}", path.display()))?;
    Ok(text.lines().filter(|l| !l.is_empty()).map(str::to_string).collect())
}

impl Cli {
    /// Merge the flags over `file`, then fill the gaps from the environment
    /// and host.
    pub fn resolve(self, file: FileConfig) -> Result<Settings> {
        let phrases = if !self.phrases.is_empty() {
            self.phrases
        } else if let Some(path) = self.phrases_file.as_ref().or(file.phrases_file.as_ref()) {
            read_phrases(path)?
        } else {
            file.phrases
        };

        let cores = self.cores.or(file.cores).unwrap_or_else(env::cores).max(1);
        let time_limit =
            self.time_limit.or(file.time_limit).map(Duration::from_secs).unwrap_or(DEFAULT_TIME_LIMIT);
        let mem_limit = self
            .mem_limit
            .or(file.mem_limit)
            .unwrap_or_else(|| env::free_memory_mib().saturating_sub(HOST_RESERVE_MIB));

        let cgroup = (!(self.disable_cgroup || file.disable_cgroup)).then(|| {
            let root = env::cgroup_root()
                .or(file.cgroup.root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CGROUP_ROOT));
            let name = env::cgroup_name()
                .or(file.cgroup.name)
                .unwrap_or_else(|| DEFAULT_CGROUP_NAME.to_string());
            Cgroup::new(root, name)
        });

        let mut supervisor = SupervisorConfig::default()
            .quick_solvers(first_non_empty(self.quick_solvers, file.quick_solvers))
            .heavy_solvers(first_non_empty(self.heavy_solvers, file.heavy_solvers))
            .extra_solvers(first_non_empty(self.extra_solvers, file.extra_solvers))
            .phrases(phrases)
            .concurrency(cores * 2)
            .cgroup(cgroup);
        if let Some(rewriter) = self.rewriter.or(file.rewriter) {
            supervisor = supervisor.rewriter(rewriter);
        }
        if let Some(wrapper) = self.solver_wrapper.or(file.solver_wrapper) {
            supervisor = supervisor.wrapper(wrapper);
        }
        if let Some(heartbeat) =
            env::heartbeat().or(file.heartbeat_ms.filter(|ms| *ms > 0).map(Duration::from_millis))
        {
            supervisor = supervisor.heartbeat(heartbeat);
        }

        Ok(Settings {
            problems: self.problems,
            prior: self.prior.or(file.prior),
            cores,
            time_limit,
            mem_limit,
            supervisor,
            show_scores: self.show_scores || file.show_scores,
            strip_extra_fields: self.strip_extra_fields || file.strip_extra_fields,
        })
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
