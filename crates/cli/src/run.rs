// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One supervision run, from problem files to answers on stdout.

use crate::cli::Settings;
use crate::output;
use anyhow::{Context, Result};
use foreman_core::{load_priors, load_tasks, Task, TaskId};
use foreman_engine::Supervisor;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;

/// Slack kept between the overall deadline and the time limit.
const EXIT_MARGIN: std::time::Duration = std::time::Duration::from_secs(1);

pub async fn run(settings: Settings, started: Instant) -> Result<()> {
    tracing::info!(
        cores = settings.cores,
        seconds = settings.time_limit.as_secs(),
        megabytes = settings.mem_limit,
        "limits"
    );

    let tasks: Vec<Arc<Task>> = load_tasks(&settings.problems)
        .context("failed to load problems")?
        .into_iter()
        .map(Arc::new)
        .collect();
    tracing::info!(problems = settings.problems.len(), tasks = tasks.len(), "input");

    let priors = match &settings.prior {
        Some(path) => {
            let known: HashSet<TaskId> = tasks.iter().map(|t| t.id()).collect();
            load_priors(path, &known).context("failed to load prior solutions")?
        }
        None => Vec::new(),
    };

    if let Some(cgroup) = &settings.supervisor.cgroup {
        match cgroup.set_memory_limit(settings.worker_memory_bytes()) {
            Ok(path) => tracing::debug!(path = %path.display(), "set worker memory limit"),
            Err(e) => tracing::error!(
                error = %e,
                "failed to set cgroup memory limit; pass --disable-cgroup to run without a cgroup"
            ),
        }
    }

    let deadline = (started + settings.time_limit).checked_sub(EXIT_MARGIN).unwrap_or(started);
    let supervisor = Supervisor::new(settings.supervisor.clone());
    let answers = supervisor.solve(&tasks, priors, deadline).await;

    output::write_answers(&mut std::io::stdout().lock(), &answers, settings.strip_extra_fields)
        .context("failed to write answers")?;
    if settings.show_scores {
        output::log_scores(&answers);
    }
    Ok(())
}
