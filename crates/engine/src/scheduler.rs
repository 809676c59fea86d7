// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline-bounded admission of jobs onto a fixed number of slots.
//!
//! A run admits jobs best-ranked first while slots are free. At the soft
//! deadline every running job is interrupted once and admission stops; at
//! the hard deadline whatever is still running is killed.

use crate::job::{FinishCallback, Job};
use foreman_core::Solution;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Runs batches of jobs with at most `concurrency` alive at once.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    concurrency: usize,
}

/// What happened to each job handed to [`Scheduler::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Jobs whose process exited before the hard deadline.
    pub finished: Vec<Arc<Job>>,
    /// Jobs still running at the hard deadline and killed.
    pub terminated: Vec<Arc<Job>>,
    /// Jobs never admitted.
    pub unstarted: Vec<Arc<Job>>,
    /// Admitted jobs in start order.
    pub order: Vec<Arc<Job>>,
}

impl RunReport {
    /// Best non-sentinel solution of every started job, finished or not.
    pub fn solutions(&self) -> Vec<Solution> {
        self.order.iter().map(|job| job.best()).filter(|s| !s.is_sentinel()).collect()
    }
}

impl Scheduler {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency: concurrency.max(1) }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `jobs` until they all finish or the hard deadline passes.
    pub async fn run(&self, jobs: Vec<Arc<Job>>, soft: Instant, hard: Instant) -> RunReport {
        let (tx, mut rx) = mpsc::unbounded_channel::<Arc<Job>>();
        let mut pending = jobs;
        let mut running: Vec<Arc<Job>> = Vec::new();
        let mut report = RunReport::default();
        let mut graceful = false;

        tracing::debug!(jobs = pending.len(), concurrency = self.concurrency, "scheduler run starting");

        while !running.is_empty() || (!graceful && !pending.is_empty()) {
            let now = Instant::now();
            if now >= hard {
                break;
            }

            if !graceful && now >= soft {
                graceful = true;
                tracing::debug!(running = running.len(), "soft deadline reached, interrupting");
                for job in &running {
                    job.interrupt();
                }
            }

            if !graceful {
                while running.len() < self.concurrency {
                    let Some(next) = take_best(&mut pending) else { break };
                    next.register_finish_callback(report_finish(tx.clone()));
                    // Launch failures finalize the job and arrive as a finish.
                    let _ = next.start();
                    report.order.push(Arc::clone(&next));
                    running.push(next);
                }
            }

            let until = if graceful { hard } else { soft };
            match tokio::time::timeout_at(until, rx.recv()).await {
                Ok(Some(job)) => {
                    job.wait().await;
                    running.retain(|r| !Arc::ptr_eq(r, &job));
                    report.finished.push(job);
                }
                Ok(None) => break,
                Err(_) if graceful => break,
                Err(_) => {}
            }
        }

        for orphan in running {
            orphan.terminate();
            report.terminated.push(orphan);
        }
        report.unstarted = pending;

        tracing::info!(
            finished = report.finished.len(),
            terminated = report.terminated.len(),
            unstarted = report.unstarted.len(),
            "scheduler run complete"
        );
        for job in &report.order {
            match job.elapsed() {
                Some(elapsed) => {
                    tracing::debug!(job = %job, score = job.best_score(), ?elapsed, "executed")
                }
                None => tracing::debug!(job = %job, score = job.best_score(), "overrun"),
            }
        }
        report
    }
}

/// Queue a finished job back to the run loop. Orphans terminated at the hard
/// deadline finalize after the loop has returned, so a closed queue is fine.
fn report_finish(queue: mpsc::UnboundedSender<Arc<Job>>) -> FinishCallback {
    Box::new(move |job| {
        let _ = queue.send(Arc::clone(job));
        Ok(())
    })
}

/// Remove and return the job with the lowest `(priority, size)`; the
/// earliest listed wins ties.
fn take_best(pending: &mut Vec<Arc<Job>>) -> Option<Arc<Job>> {
    let index = pending
        .iter()
        .enumerate()
        .min_by_key(|(i, job)| (job.rank(), *i))
        .map(|(i, _)| i)?;
    Some(pending.remove(index))
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
