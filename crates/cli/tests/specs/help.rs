// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and argument errors.

use crate::prelude::*;

#[test]
fn help_lists_flags() {
    let temp = Project::empty();
    let out = temp.foreman().args(["--help"]).passes();
    for flag in ["--problem", "--quick-solver", "--heavy-solver", "--rewriter", "--timelimit"] {
        assert!(out.stdout().contains(flag), "missing {flag} in:\n{}", out.stdout());
    }
}

#[test]
fn problem_flag_is_required() {
    let temp = Project::empty();
    let out = temp.foreman().fails();
    assert!(out.stderr().contains("--problem"));
}

#[test]
fn missing_problem_file_fails() {
    let temp = Project::empty();
    let out = temp.foreman().args(["-f", "absent.json", "--disable-cgroup", "-m", "256"]).fails();
    assert!(out.stderr().contains("absent.json"), "stderr:\n{}", out.stderr());
    assert!(out.stdout().is_empty());
}
