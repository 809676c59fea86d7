// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The quick, heavy and rewrite phases of a supervision run.
//!
//! Quick, heavy and extra solver jobs share one scheduler run, ordered by
//! priority tier. Heavy jobs on secondary seeds wait behind a
//! [`RescheduleBarrier`] for the primary seed of their problem. Whatever the
//! solvers found is then handed to the rewriter in a second run.

mod barrier;
mod deadline;

pub use barrier::{
    secondary_tier, RescheduleBarrier, HEAVY_LAGGING_TIER, HEAVY_LEADING_TIER, SECONDARY_FALLBACK,
};
pub use deadline::{rewrite_budget, split, DeadlineSplit, PhaseWindow};

use crate::aggregate::choose_best;
use crate::config::SupervisorConfig;
use crate::job::{Job, Priority, Role};
use crate::scheduler::Scheduler;
use foreman_core::{Solution, Task, TaskId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;

pub const QUICK_PRIORITY: Priority = 100;
pub const PRIMARY_HEAVY_PRIORITY: Priority = 200;
pub const EXTRA_PRIORITY: Priority = 900;

/// Plans and runs the phases of one supervision run.
pub struct Supervisor {
    config: SupervisorConfig,
    scheduler: Scheduler,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let scheduler = Scheduler::new(config.concurrency);
        Self { config, scheduler }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    fn solver_job(&self, task: &Arc<Task>, program: &str, role: Role, priority: Priority) -> Arc<Job> {
        Arc::new(
            Job::solver(Arc::clone(task), self.config.solver_args(program), role)
                .with_priority(priority)
                .with_cgroup(self.config.cgroup.clone())
                .with_wrapper(self.config.wrapper.clone())
                .with_heartbeat(Some(self.config.heartbeat)),
        )
    }

    /// Build every solver job for `tasks` and wire the secondary
    /// re-prioritization barriers.
    ///
    /// The first task listed for each problem is its primary task, even when
    /// the same task id is listed again. Quick and extra solvers run on every
    /// task; heavy solvers run on primary tasks at a fixed tier and on
    /// secondary tasks at the fallback priority until their problem's
    /// barrier fires.
    pub fn plan_solvers(&self, tasks: &[Arc<Task>]) -> Vec<Arc<Job>> {
        let mut first_index: HashMap<u64, usize> = HashMap::new();
        for (index, task) in tasks.iter().enumerate() {
            first_index.entry(task.problem_id()).or_insert(index);
        }
        let is_primary =
            |index: usize, task: &Task| first_index.get(&task.problem_id()) == Some(&index);
        let (primary, secondary): (Vec<_>, Vec<_>) =
            tasks.iter().enumerate().partition(|(index, task)| is_primary(*index, task));

        let mut jobs = Vec::new();
        let mut primaries: IndexMap<u64, Vec<Arc<Job>>> = IndexMap::new();
        let mut secondaries: IndexMap<u64, Vec<Arc<Job>>> = IndexMap::new();

        for program in &self.config.quick_solvers {
            for (index, task) in tasks.iter().enumerate() {
                let job = self.solver_job(task, program, Role::Quick, QUICK_PRIORITY);
                if is_primary(index, task) {
                    primaries.entry(task.problem_id()).or_default().push(Arc::clone(&job));
                }
                jobs.push(job);
            }
        }
        for program in &self.config.heavy_solvers {
            for (_, task) in &primary {
                let job = self.solver_job(task, program, Role::Heavy, PRIMARY_HEAVY_PRIORITY);
                primaries.entry(task.problem_id()).or_default().push(Arc::clone(&job));
                jobs.push(job);
            }
        }
        for program in &self.config.heavy_solvers {
            for (_, task) in &secondary {
                let job = self.solver_job(task, program, Role::Heavy, SECONDARY_FALLBACK);
                secondaries.entry(task.problem_id()).or_default().push(Arc::clone(&job));
                jobs.push(job);
            }
        }
        for program in &self.config.extra_solvers {
            for task in tasks {
                jobs.push(self.solver_job(task, program, Role::Extra, EXTRA_PRIORITY));
            }
        }

        for (problem_id, waiting) in secondaries {
            let watched = primaries.get(&problem_id).map(Vec::as_slice).unwrap_or_default();
            let barrier = Arc::new(RescheduleBarrier::new(problem_id, watched.len(), waiting));
            barrier.watch(watched);
        }
        jobs
    }

    /// Run every solver against `tasks`, returning each job's best
    /// non-sentinel solution.
    pub async fn run_solvers(&self, tasks: &[Arc<Task>], window: PhaseWindow) -> Vec<Solution> {
        let jobs = self.plan_solvers(tasks);
        let start = Instant::now();
        tracing::info!(
            jobs = jobs.len(),
            soft = ?window.soft.saturating_duration_since(start),
            hard = ?window.hard.saturating_duration_since(start),
            "solver phase starting"
        );
        let solutions = self.scheduler.run(jobs, window.soft, window.hard).await.solutions();
        tracing::info!(solutions = solutions.len(), elapsed = ?start.elapsed(), "solver phase done");
        solutions
    }

    /// One rewriter job per non-sentinel solution, best originals first.
    ///
    /// Each job's priority is the rank of its original among the solutions
    /// for the same task (0 for the best). Empty when no rewriter is set.
    pub fn plan_rewrites(&self, originals: &[Solution], tasks: &[Arc<Task>]) -> Vec<Arc<Job>> {
        let Some(args) = self.config.rewriter_args() else {
            return Vec::new();
        };
        let by_id: HashMap<TaskId, &Arc<Task>> = tasks.iter().map(|t| (t.id(), t)).collect();

        let mut ordered: Vec<&Solution> = originals.iter().filter(|s| !s.is_sentinel()).collect();
        ordered.sort_by(|a, b| b.score.cmp(&a.score));

        let mut ranks: HashMap<TaskId, Priority> = HashMap::new();
        let mut jobs = Vec::new();
        for original in ordered {
            let Some(task) = by_id.get(&original.task_id()) else {
                tracing::warn!(task = %original.task_id(), "no task for solution, skipping rewrite");
                continue;
            };
            let rank = ranks.entry(original.task_id()).or_insert(0);
            let job = Job::rewriter(Arc::clone(task), args.clone(), original.clone())
                .with_priority(*rank)
                .with_cgroup(self.config.cgroup.clone());
            *rank += 1;
            jobs.push(Arc::new(job));
        }
        jobs
    }

    /// Rewrite `originals`, returning the rewriter's non-sentinel results.
    pub async fn run_rewriter(
        &self,
        originals: &[Solution],
        tasks: &[Arc<Task>],
        window: PhaseWindow,
    ) -> Vec<Solution> {
        if self.config.rewriter.is_none() {
            tracing::warn!("no rewriter configured, scores will suffer");
            return Vec::new();
        }
        let jobs = self.plan_rewrites(originals, tasks);
        let start = Instant::now();
        tracing::info!(
            jobs = jobs.len(),
            soft = ?window.soft.saturating_duration_since(start),
            hard = ?window.hard.saturating_duration_since(start),
            "rewriter phase starting"
        );
        let solutions = self.scheduler.run(jobs, window.soft, window.hard).await.solutions();
        tracing::info!(solutions = solutions.len(), elapsed = ?start.elapsed(), "rewriter phase done");
        solutions
    }

    /// Solve `tasks` before `deadline`, returning one answer per task in
    /// task order. `priors` compete with everything found during the run.
    pub async fn solve(&self, tasks: &[Arc<Task>], priors: Vec<Solution>, deadline: Instant) -> Vec<Solution> {
        let total_size: u64 = tasks.iter().map(|t| t.size()).sum();
        let split = split(Instant::now(), deadline, total_size, &self.config);
        tracing::debug!(total_size, rewrite_budget = ?split.rewrite_budget, "deadline split");

        let found = self.run_solvers(tasks, split.solve).await;
        let rewritten = self.run_rewriter(&found, tasks, split.rewrite).await;

        let all = priors.into_iter().chain(found).chain(rewritten);
        choose_best(tasks.iter().map(|t| t.id()), all)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
