// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file handling.

use crate::prelude::*;

#[test]
fn config_file_supplies_solvers() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker("quick", &emit("from-config", 7));
    let config = temp.file(
        "foreman.toml",
        &format!("quick_solvers = [{quick:?}]\ndisable_cgroup = true\nmem_limit = 256\ntime_limit = 20\n"),
    );

    let out = temp.foreman().args(["-f", p1.as_str(), "--config", config.to_str().unwrap()]).passes();
    assert_eq!(out.summary(), vec![(1, 0, "from-config".into(), 7)]);
}

#[test]
fn flags_override_config_file() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let from_file = temp.worker("file-quick", &emit("file", 7));
    let from_flag = temp.worker("flag-quick", &emit("flag", 3));
    let config = temp.file(
        "foreman.toml",
        &format!("quick_solvers = [{from_file:?}]\ndisable_cgroup = true\nmem_limit = 256\n"),
    );

    let out = temp
        .foreman()
        .args(["-f", p1.as_str(), "--config", config.to_str().unwrap(), "-t", "20"])
        .args(["--quick-solver", from_flag.as_str()])
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "flag".into(), 3)]);
}

#[test]
fn invalid_config_file_fails() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let config = temp.file("foreman.toml", "no_such_key = 1\n");

    let out = temp.foreman().args(["-f", p1.as_str(), "--config", config.to_str().unwrap()]).fails();
    assert!(out.stderr().contains("foreman.toml"), "stderr:\n{}", out.stderr());
}
