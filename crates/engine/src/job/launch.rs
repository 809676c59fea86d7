// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building the worker invocation for each job flavor.

use crate::error::JobError;
use foreman_core::{Solution, Task};
use serde::Serialize;
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Job flavor, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Solver,
    Rewriter,
}

foreman_core::simple_display! {
    JobKind {
        Solver => "solver",
        Rewriter => "rewriter",
    }
}

/// How to invoke the worker for a job.
#[derive(Debug, Clone)]
pub enum Launch {
    /// Open-ended search. The task JSON is supplied on stdin.
    Solver { args: Vec<String> },
    /// Single improvement pass over `original`. The task and the original
    /// solution are staged in temporary files passed as `--problem=` and
    /// `--output=`.
    Rewriter { args: Vec<String>, original: Solution },
}

/// A ready-to-spawn command plus the temporary files it reads.
pub(crate) struct Prepared {
    pub(crate) command: Command,
    pub(crate) program: PathBuf,
    pub(crate) staged: Vec<NamedTempFile>,
}

impl Launch {
    pub fn kind(&self) -> JobKind {
        match self {
            Launch::Solver { .. } => JobKind::Solver,
            Launch::Rewriter { .. } => JobKind::Rewriter,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Launch::Solver { args } | Launch::Rewriter { args, .. } => args,
        }
    }

    /// File name of the worker program, for logs.
    pub fn program_name(&self) -> &str {
        self.args()
            .first()
            .map(|p| p.rsplit('/').next().unwrap_or(p))
            .unwrap_or("")
    }

    /// Build the command for `task`. A solver `wrapper` is run in place of
    /// the solver, with the solver's argument vector appended.
    pub(crate) fn prepare(&self, task: &Task, wrapper: Option<&str>) -> Result<Prepared, JobError> {
        let (program, rest) = self.args().split_first().ok_or(JobError::EmptyCommand)?;
        let (program, rest): (&str, Vec<&str>) = match (self, wrapper) {
            (Launch::Solver { .. }, Some(wrapper)) => {
                let wrapped = std::iter::once(program).chain(rest).map(String::as_str).collect();
                (wrapper, wrapped)
            }
            _ => (program.as_str(), rest.iter().map(String::as_str).collect()),
        };
        let mut command = Command::new(program);
        command
            .args(&rest)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let staged = match self {
            Launch::Solver { .. } => {
                let mut input = tempfile::tempfile()?;
                serde_json::to_writer(&mut input, task.payload())?;
                input.flush()?;
                input.seek(SeekFrom::Start(0))?;
                command.stdin(Stdio::from(input));
                Vec::new()
            }
            Launch::Rewriter { original, .. } => {
                let problem = stage_json(task.payload())?;
                let output = stage_json(std::slice::from_ref(original))?;
                command
                    .arg(format!("--problem={}", problem.path().display()))
                    .arg(format!("--output={}", output.path().display()))
                    .stdin(Stdio::null());
                vec![problem, output]
            }
        };

        Ok(Prepared { command, program: PathBuf::from(program), staged })
    }
}

fn stage_json<T: Serialize + ?Sized>(value: &T) -> Result<NamedTempFile, JobError> {
    let mut file = NamedTempFile::new()?;
    serde_json::to_writer(file.as_file_mut(), value)?;
    file.as_file_mut().flush()?;
    Ok(file)
}
