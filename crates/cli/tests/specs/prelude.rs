// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a scratch project with problem files and worker scripts,
//! and a runner for the binary.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel` inside the project.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write an executable shell worker that ignores keepalives.
    pub fn worker(&self, name: &str, body: &str) -> String {
        let path = self.file(&format!("bin/{name}"), &format!("#!/bin/sh\ntrap '' USR1\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    /// Write a problem document with the given seeds.
    pub fn problem(&self, id: u64, seeds: &[u64]) -> String {
        let doc = serde_json::json!({
            "id": id,
            "width": 5,
            "height": 4,
            "sourceSeeds": seeds,
            "units": [],
        });
        self.file(&format!("problems/{id}.json"), &doc.to_string()).display().to_string()
    }

    pub fn foreman(&self) -> Cmd {
        let mut cmd = assert_cmd::Command::cargo_bin("foreman").unwrap();
        cmd.current_dir(self.path())
            .env("RUST_LOG", "info")
            .env_remove("FOREMAN_CGROUP_ROOT")
            .env_remove("FOREMAN_CGROUP_NAME")
            .env_remove("FOREMAN_HEARTBEAT_MS");
        Cmd(cmd)
    }
}

/// `echo` of a one-record result line.
pub fn emit(tag: &str, score: i64) -> String {
    format!(r#"echo '[{{"tag":"{tag}","solution":"{tag}-moves","_score":{score}}}]'"#)
}

pub struct Cmd(assert_cmd::Command);

impl Cmd {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.0.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.0.env(key, value);
        self
    }

    fn run(mut self) -> Output {
        let output = self.0.output().unwrap();
        Output {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> Output {
        let output = self.run();
        assert!(output.success, "expected success, stderr:\n{}", output.stderr);
        output
    }

    pub fn fails(self) -> Output {
        let output = self.run();
        assert!(!output.success, "expected failure, stdout:\n{}", output.stdout);
        output
    }
}

pub struct Output {
    success: bool,
    stdout: String,
    stderr: String,
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Stdout parsed as the answer array.
    pub fn answers(&self) -> Vec<serde_json::Value> {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not an answer array ({e}):\n{}", self.stdout))
    }

    /// `(problemId, seed, tag, _score)` of every answer.
    pub fn summary(&self) -> Vec<(u64, u64, String, i64)> {
        self.answers()
            .iter()
            .map(|a| {
                (
                    a["problemId"].as_u64().unwrap(),
                    a["seed"].as_u64().unwrap(),
                    a["tag"].as_str().unwrap().to_string(),
                    a["_score"].as_i64().unwrap_or(-1),
                )
            })
            .collect()
    }
}
