// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervised runs of one external worker process against one task.
//!
//! A [`Job`] owns at most one live process. Once started, a background reader
//! task decodes the worker's best-result stream and, for solvers, a second
//! task sends a keepalive signal on a fixed period. Every exit path (normal
//! exit, kill, failed launch) converges on one finalize routine that records
//! the exit status and runs the finish callbacks exactly once.

mod launch;
mod state;

pub use launch::{JobKind, Launch};
pub use state::JobState;

use crate::cgroup::Cgroup;
use crate::error::{CallbackError, JobError};
use crate::protocol::{self, BestSolution};
use crate::signal::{self, WorkerSignal};
use foreman_core::{Solution, Task, TaskId};
use nix::errno::Errno;
use parking_lot::Mutex;
use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Scheduling rank. Lower runs first.
pub type Priority = i64;

pub const DEFAULT_PRIORITY: Priority = -1;

/// Period of the solver keepalive signal.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(1);

/// Called once when the job reaches a terminal state.
pub type FinishCallback = Box<dyn FnOnce(&Arc<Job>) -> Result<(), CallbackError> + Send>;

/// Which phase of a run built the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Quick,
    Heavy,
    Extra,
    Rewrite,
}

foreman_core::simple_display! {
    Role {
        Quick => "quick",
        Heavy => "heavy",
        Extra => "extra",
        Rewrite => "rewrite",
    }
}

/// Progress reported to whoever watches a job.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The job's best score went up.
    Improved { task: TaskId, score: i64 },
    /// The job reached a terminal state.
    Finished(Arc<Job>),
}

struct Inner {
    state: JobState,
    priority: Priority,
    best: BestSolution,
    pid: Option<u32>,
    kill_requested: bool,
    exit: Option<ExitStatus>,
    exit_observed: bool,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

pub struct Job {
    task: Arc<Task>,
    launch: Launch,
    role: Role,
    cgroup: Option<Cgroup>,
    wrapper: Option<String>,
    heartbeat: Option<Duration>,
    inner: Mutex<Inner>,
    callbacks: Mutex<Vec<FinishCallback>>,
    watchers: Mutex<Vec<mpsc::UnboundedSender<JobEvent>>>,
    reader: Mutex<Option<JoinHandle<()>>>,
    /// Cancelled by `terminate()`; the reader kills the child.
    kill: CancellationToken,
    /// Cancelled when the process is gone; stops the heartbeat.
    exited: CancellationToken,
    /// Cancelled after the finish callbacks ran.
    done: CancellationToken,
}

impl Job {
    pub fn new(task: Arc<Task>, launch: Launch, role: Role) -> Self {
        let heartbeat = match launch.kind() {
            JobKind::Solver => Some(DEFAULT_HEARTBEAT),
            JobKind::Rewriter => None,
        };
        let best = BestSolution::new(task.id());
        Self {
            task,
            launch,
            role,
            cgroup: None,
            wrapper: None,
            heartbeat,
            inner: Mutex::new(Inner {
                state: JobState::Created,
                priority: DEFAULT_PRIORITY,
                best,
                pid: None,
                kill_requested: false,
                exit: None,
                exit_observed: false,
                started_at: None,
                ended_at: None,
            }),
            callbacks: Mutex::new(Vec::new()),
            watchers: Mutex::new(Vec::new()),
            reader: Mutex::new(None),
            kill: CancellationToken::new(),
            exited: CancellationToken::new(),
            done: CancellationToken::new(),
        }
    }

    /// Solver job: `args` is the program followed by its flags.
    pub fn solver(task: Arc<Task>, args: Vec<String>, role: Role) -> Self {
        Self::new(task, Launch::Solver { args }, role)
    }

    /// Rewriter job improving `original`, an earlier solution for `task`.
    pub fn rewriter(task: Arc<Task>, args: Vec<String>, original: Solution) -> Self {
        Self::new(task, Launch::Rewriter { args, original }, Role::Rewrite)
    }

    pub fn with_priority(self, priority: Priority) -> Self {
        self.inner.lock().priority = priority;
        self
    }

    pub fn with_cgroup(mut self, cgroup: Option<Cgroup>) -> Self {
        self.cgroup = cgroup;
        self
    }

    /// Run solvers through `wrapper`, which receives the solver command as
    /// its arguments.
    pub fn with_wrapper(mut self, wrapper: Option<String>) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Override the keepalive period. Has no effect on rewriters.
    pub fn with_heartbeat(mut self, period: Option<Duration>) -> Self {
        if self.launch.kind() == JobKind::Solver {
            self.heartbeat = period;
        }
        self
    }

    pub fn task(&self) -> &Arc<Task> {
        &self.task
    }

    pub fn task_id(&self) -> TaskId {
        self.task.id()
    }

    pub fn size(&self) -> u64 {
        self.task.size()
    }

    pub fn kind(&self) -> JobKind {
        self.launch.kind()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn args(&self) -> &[String] {
        self.launch.args()
    }

    pub fn state(&self) -> JobState {
        self.inner.lock().state
    }

    pub fn priority(&self) -> Priority {
        self.inner.lock().priority
    }

    /// Scheduling key: lower priority first, then smaller task.
    pub fn rank(&self) -> (Priority, u64) {
        (self.priority(), self.size())
    }

    /// Change the priority. Ignored once the job has started.
    pub fn set_priority(&self, priority: Priority) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.state != JobState::Created {
                return false;
            }
            inner.priority = priority;
        }
        tracing::debug!(job = %self, "rescheduled priority");
        true
    }

    /// Best solution seen so far (the sentinel until the worker reports).
    pub fn best(&self) -> Solution {
        self.inner.lock().best.get().clone()
    }

    pub fn best_score(&self) -> i64 {
        self.inner.lock().best.score()
    }

    /// Process id while the worker is alive; cleared once it is reaped.
    pub fn pid(&self) -> Option<u32> {
        self.inner.lock().pid
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.inner.lock().exit
    }

    /// Wall time between start and finalize, if both happened.
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.inner.lock();
        match (inner.started_at, inner.ended_at) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.inner.lock().started_at
    }

    /// Register a callback run once when the job reaches a terminal state.
    /// Runs immediately if it already has.
    pub fn register_finish_callback(self: &Arc<Self>, callback: FinishCallback) {
        {
            let inner = self.inner.lock();
            if !inner.state.is_terminal() {
                self.callbacks.lock().push(callback);
                return;
            }
        }
        self.run_callback(callback);
    }

    /// Subscribe to score improvements and the finish event.
    pub fn watch(&self, tx: mpsc::UnboundedSender<JobEvent>) {
        self.watchers.lock().push(tx);
    }

    /// Spawn the worker process.
    ///
    /// A launch failure is logged and finalizes the job as finished, so
    /// callers waiting on the finish callbacks still hear about it.
    pub fn start(self: &Arc<Self>) -> Result<(), JobError> {
        {
            let mut inner = self.inner.lock();
            if inner.state != JobState::Created {
                return Err(JobError::AlreadyStarted);
            }
            inner.state = JobState::Started;
            inner.started_at = Some(Instant::now());
        }
        tracing::debug!(job = %self, "starting");

        let (child, staged) = match self.spawn() {
            Ok(spawned) => spawned,
            Err(e) => {
                tracing::error!(job = %self, error = %e, "failed to launch worker");
                self.finalize(None);
                return Err(e);
            }
        };

        if !staged.is_empty() {
            self.register_finish_callback(Box::new(move |_| {
                for file in staged {
                    file.close()?;
                }
                Ok(())
            }));
        }

        let reader = tokio::spawn(read_output(Arc::clone(self), child));
        *self.reader.lock() = Some(reader);

        if let Some(period) = self.heartbeat {
            tokio::spawn(heartbeat(Arc::clone(self), period));
        }
        Ok(())
    }

    fn spawn(&self) -> Result<(Child, Vec<tempfile::NamedTempFile>), JobError> {
        let mut prepared = self.launch.prepare(&self.task, self.wrapper.as_deref())?;
        let child = prepared
            .command
            .spawn()
            .map_err(|source| JobError::Spawn { program: prepared.program.clone(), source })?;
        let pid = child.id();
        self.inner.lock().pid = pid;

        if let (Some(cgroup), Some(pid)) = (&self.cgroup, pid) {
            if let Err(e) = cgroup.attach(pid) {
                tracing::warn!(job = %self, cgroup = cgroup.name(), error = %e, "failed to confine worker");
            }
        }
        Ok((child, prepared.staged))
    }

    /// Ask the worker to stop gracefully. Sent at most once per job.
    pub fn interrupt(&self) -> bool {
        let sent = {
            let mut inner = self.inner.lock();
            let state = inner.state;
            match state {
                JobState::Started => {
                    inner.state = JobState::Interrupted;
                    Some(inner.pid.map_or(Err(Errno::ESRCH), |pid| {
                        signal::send(pid, WorkerSignal::Interrupt)
                    }))
                }
                JobState::Created => None,
                _ => return false,
            }
        };
        let Some(sent) = sent else {
            tracing::error!(job = %self, "attempted to interrupt an unstarted job");
            return false;
        };
        tracing::debug!(job = %self, "interrupting");
        if let Err(e) = sent {
            tracing::debug!(job = %self, error = %e, "interrupt not delivered");
        }
        true
    }

    /// Forcibly kill the worker.
    pub fn terminate(&self) -> bool {
        let state = {
            let mut inner = self.inner.lock();
            if inner.state.is_running() {
                inner.kill_requested = true;
            }
            inner.state
        };
        match state {
            JobState::Started | JobState::Interrupted => {}
            JobState::Created => {
                tracing::error!(job = %self, "attempted to terminate an unstarted job");
                return false;
            }
            JobState::Finished | JobState::Terminated => return false,
        }
        tracing::debug!(job = %self, "terminating");
        self.kill.cancel();
        true
    }

    /// Whether the process has exited and the job was finalized.
    pub fn poll(&self) -> bool {
        if !self.done.is_cancelled() {
            return false;
        }
        self.observe_exit();
        true
    }

    /// Wait until the job is finalized, then join its reader.
    pub async fn wait(&self) -> Option<ExitStatus> {
        self.done.cancelled().await;
        let reader = self.reader.lock().take();
        if let Some(reader) = reader {
            if let Err(e) = reader.await {
                tracing::error!(job = %self, error = %e, "output reader task failed");
            }
        }
        self.observe_exit()
    }

    fn observe_exit(&self) -> Option<ExitStatus> {
        let (exit, first) = {
            let mut inner = self.inner.lock();
            let first = !inner.exit_observed;
            inner.exit_observed = true;
            (inner.exit, first)
        };
        if let (true, Some(status)) = (first, exit) {
            if !status.success() {
                tracing::warn!(job = %self, exit = %status, "job finished abnormally");
            }
        }
        exit
    }

    /// Signal the worker while holding the lock, so a reaped pid is never
    /// targeted.
    fn send_signal(&self, signal: WorkerSignal) -> Result<(), Errno> {
        let inner = self.inner.lock();
        let pid = inner.pid.ok_or(Errno::ESRCH)?;
        signal::send(pid, signal)
    }

    fn handle_line(&self, line: &str) {
        let solutions = match protocol::decode_line(line, self.task.id()) {
            Ok(solutions) => solutions,
            Err(e) => {
                tracing::warn!(job = %self, error = %e, "dropping worker output line");
                return;
            }
        };
        for solution in solutions {
            let improved = {
                let mut inner = self.inner.lock();
                inner.best.offer(solution).then(|| inner.best.score())
            };
            if let Some(score) = improved {
                tracing::info!(job = %self, score, "got score");
                self.notify(JobEvent::Improved { task: self.task.id(), score });
            }
        }
    }

    fn notify(&self, event: JobEvent) {
        self.watchers.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn finalize(self: &Arc<Self>, exit: Option<ExitStatus>) {
        {
            let mut inner = self.inner.lock();
            inner.exit = exit;
            inner.ended_at = Some(Instant::now());
            inner.state =
                if inner.kill_requested { JobState::Terminated } else { JobState::Finished };
        }
        self.exited.cancel();
        tracing::debug!(job = %self, elapsed = ?self.elapsed(), "finished");

        let callbacks = std::mem::take(&mut *self.callbacks.lock());
        for callback in callbacks {
            self.run_callback(callback);
        }
        self.notify(JobEvent::Finished(Arc::clone(self)));
        self.done.cancel();
    }

    fn run_callback(self: &Arc<Self>, callback: FinishCallback) {
        if let Err(e) = callback(self) {
            tracing::error!(job = %self, error = %e, "finish callback failed");
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} pri={} {}",
            self.launch.kind(),
            self.task.id(),
            self.priority(),
            self.launch.program_name()
        )
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("task", &self.task.id())
            .field("kind", &self.launch.kind())
            .field("role", &self.role)
            .field("state", &self.state())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Decode the worker's stdout until it closes or a kill is requested, then
/// reap the process and finalize the job.
async fn read_output(job: Arc<Job>, mut child: Child) {
    let mut killed = false;
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = tokio::select! {
                _ = job.kill.cancelled() => None,
                read = reader.read_until(b'\n', &mut buf) => Some(read),
            };
            match read {
                None => {
                    killed = true;
                    break;
                }
                Some(Ok(0)) => break,
                Some(Ok(_)) => match std::str::from_utf8(&buf) {
                    Ok(line) => job.handle_line(line.trim_end_matches(['\n', '\r'])),
                    Err(e) => {
                        tracing::warn!(job = %job, error = %e, "dropping non-UTF-8 worker output line");
                    }
                },
                Some(Err(e)) => {
                    tracing::warn!(job = %job, error = %e, "failed to read worker output");
                    break;
                }
            }
        }
    }

    let exit = if killed || job.kill.is_cancelled() {
        if let Err(e) = child.start_kill() {
            tracing::debug!(job = %job, error = %e, "kill failed");
        }
        child.wait().await
    } else {
        let _ = job.send_signal(WorkerSignal::Terminate);
        let reaped = tokio::select! {
            status = child.wait() => Some(status),
            _ = job.kill.cancelled() => None,
        };
        match reaped {
            Some(status) => status,
            None => {
                let _ = child.start_kill();
                child.wait().await
            }
        }
    };
    job.inner.lock().pid = None;
    let exit = match exit {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::error!(job = %job, error = %e, "failed to reap worker");
            None
        }
    };
    job.finalize(exit);
}

/// Send the keepalive signal every `period` until the process is gone.
async fn heartbeat(job: Arc<Job>, period: Duration) {
    loop {
        tokio::select! {
            _ = job.exited.cancelled() => return,
            _ = tokio::time::sleep(period) => {}
        }
        match job.send_signal(WorkerSignal::Keepalive) {
            Ok(()) => {}
            Err(e) if signal::is_gone(e) => return,
            Err(e) => {
                tracing::warn!(job = %job, error = %e, "failed to send keepalive");
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
