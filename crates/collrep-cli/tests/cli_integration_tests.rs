// collrep - Collective-call log replay toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn collrep_cmd() -> Command {
    Command::cargo_bin("collrep").expect("Failed to find collrep binary")
}

fn trace_line(rank: u32, coll: &str, count: u64, datatype: &str, nranks: u32) -> String {
    format!(
        "gpu-node-01:2841:2841 [{}] NCCL INFO {}: opCount 0 sendbuff 0x7f3a40000000 recvbuff 0x7f3a48000000 count {} datatype {} op 0 root 0 comm 0x55d1c8e0 [nranks={}] stream 0x55d1c900",
        rank, coll, count, datatype, nranks
    )
}

/// Two ranks, each issuing the same AllReduce twice and one Broadcast.
fn two_rank_log() -> String {
    let mut lines = vec!["gpu-node-01:2841:2841 [0] NCCL INFO Bootstrap : Using ib0".to_string()];
    for rank in 0..2 {
        lines.push(trace_line(rank, "AllReduce", 1024, "7", 2));
        lines.push(trace_line(rank, "AllReduce", 1024, "7", 2));
        lines.push(trace_line(rank, "Broadcast", 256, "0", 2));
    }
    lines.join("\n") + "\n"
}

fn write_log(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("rccl_debug.log");
    fs::write(&path, content).expect("Failed to write log");
    path.display().to_string()
}

// ===== Help and Version =====

#[test]
fn test_help_output() {
    collrep_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("collrep - Collective-call log replay toolkit"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_version_output() {
    collrep_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("collrep"));
}

#[test]
fn test_no_subcommand_fails() {
    collrep_cmd().assert().failure();
}

// ===== Parse =====

#[test]
fn test_parse_writes_full_script() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());

    collrep_cmd()
        .current_dir(dir.path())
        .args(["parse", "--nccl-debug-log", &log, "--platform", "cuda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("net_nccl_rccl.sh"));

    let script = fs::read_to_string(dir.path().join("net_nccl_rccl.sh")).unwrap();
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "./nccl-tests/build/all_reduce_perf -d float -b 4096 -e 4096 -o sum -g 2"
    );
    assert!(!dir.path().join("net_nccl_rccl_counts.csv").exists());
}

#[test]
fn test_parse_unique_writes_script_and_counts() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "parse",
            "--nccl-debug-log",
            &log,
            "--platform",
            "rocm",
            "--unique",
            "--output-script-name",
            "net",
        ])
        .assert()
        .success();

    let script = fs::read_to_string(dir.path().join("net_unique.sh")).unwrap();
    assert_eq!(
        script,
        "./rccl-tests/build/all_reduce_perf -d float -b 4096 -e 4096 -o sum -g 2\n\
         ./rccl-tests/build/broadcast_perf -d int8 -b 256 -e 256 -o sum -g 2\n"
    );

    let counts = fs::read_to_string(dir.path().join("net_counts.csv")).unwrap();
    assert_eq!(
        counts,
        "sep=|\n\
         ./rccl-tests/build/all_reduce_perf -d float -b 4096 -e 4096 -o sum -g 2|2\n\
         ./rccl-tests/build/broadcast_perf -d int8 -b 256 -e 256 -o sum -g 2|1\n"
    );
}

#[test]
fn test_parse_parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());

    for (name, extra) in [("seq", None), ("par", Some("--parallel"))] {
        let mut cmd = collrep_cmd();
        cmd.current_dir(dir.path()).args([
            "parse",
            "--nccl-debug-log",
            &log,
            "--platform",
            "cuda",
            "--output-script-name",
            name,
        ]);
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        cmd.assert().success();
    }

    assert_eq!(
        fs::read_to_string(dir.path().join("seq.sh")).unwrap(),
        fs::read_to_string(dir.path().join("par.sh")).unwrap()
    );
}

#[test]
fn test_parse_custom_prefix() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &trace_line(0, "AllToAll", 8, "4", 1));

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "parse",
            "--nccl-debug-log",
            &log,
            "--platform",
            "cuda",
            "--prefix",
            "/opt/nccl-tests/build/",
        ])
        .assert()
        .success();

    let script = fs::read_to_string(dir.path().join("net_nccl_rccl.sh")).unwrap();
    assert_eq!(script, "/opt/nccl-tests/build/alltoall_perf -d int64 -b 64 -e 64 -o sum -g 1\n");
}

#[test]
fn test_parse_unique_rejects_delimiter_in_prefix() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &trace_line(0, "AllReduce", 8, "7", 1));

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "parse",
            "--nccl-debug-log",
            &log,
            "--platform",
            "cuda",
            "--unique",
            "--prefix",
            "/opt/a|b/",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count delimiter"));

    assert!(!dir.path().join("net_nccl_rccl_unique.sh").exists());
    assert!(!dir.path().join("net_nccl_rccl_counts.csv").exists());
}

#[test]
fn test_parse_unknown_datatype_fails_with_line() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &format!("NCCL INFO init\n{}\n", trace_line(0, "AllReduce", 4, "99", 1)));

    collrep_cmd()
        .current_dir(dir.path())
        .args(["parse", "--nccl-debug-log", &log, "--platform", "cuda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("line 2"));

    assert!(!dir.path().join("net_nccl_rccl.sh").exists());
}

#[test]
fn test_parse_strict_rejects_uneven_counts() {
    let dir = TempDir::new().unwrap();
    let log: Vec<String> = (0..3).map(|r| trace_line(r, "AllReduce", 4, "7", 2)).collect();
    let log = write_log(&dir, &log.join("\n"));

    collrep_cmd()
        .current_dir(dir.path())
        .args(["parse", "--nccl-debug-log", &log, "--platform", "rocm", "--unique"])
        .assert()
        .success();

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "parse",
            "--nccl-debug-log",
            &log,
            "--platform",
            "rocm",
            "--unique",
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_strict_help_names_all_anomalies() {
    for sub in ["parse", "replay"] {
        collrep_cmd()
            .args([sub, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("participant mismatch"))
            .stdout(predicate::str::contains("zero participants"));
    }
}

#[test]
fn test_parse_missing_log_fails() {
    collrep_cmd()
        .args(["parse", "--nccl-debug-log", "/nonexistent/trace.log", "--platform", "cuda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/trace.log"));
}

#[test]
fn test_parse_respects_max_file_size() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());

    collrep_cmd()
        .current_dir(dir.path())
        .env("COLLREP_MAX_FILE_SIZE", "16")
        .args(["parse", "--nccl-debug-log", &log, "--platform", "cuda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_parse_invalid_platform() {
    collrep_cmd()
        .args(["parse", "--nccl-debug-log", "x.log", "--platform", "metal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metal"));
}

// ===== Inspect =====

#[test]
fn test_inspect_json() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());

    let output = collrep_cmd()
        .args(["inspect", "--nccl-debug-log", &log, "--platform", "rocm", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let calls = value.as_array().unwrap();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0]["line"], 2);
    assert_eq!(calls[0]["record"]["participant_count"], 2);
    assert_eq!(calls[0]["record"]["datatype"], "float");
    assert_eq!(
        calls[2]["command"],
        "./rccl-tests/build/broadcast_perf -d int8 -b 256 -e 256 -o sum -g 2"
    );
}

#[test]
fn test_inspect_text() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &trace_line(0, "mscclFuncAllGather", 32, "10", 4));

    collrep_cmd()
        .args(["inspect", "--nccl-debug-log", &log, "--platform", "cuda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AllGather"))
        .stdout(predicate::str::contains("f8e4m3"));
}

// ===== Detect platform =====

#[test]
fn test_detect_platform_from_rocm_path() {
    let dir = TempDir::new().unwrap();

    collrep_cmd()
        .env("ROCM_PATH", dir.path())
        .arg("detect-platform")
        .assert()
        .success()
        .stdout(predicate::str::diff("rocm\n"));
}

// ===== Completion =====

#[test]
fn test_completion_bash() {
    collrep_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collrep"));
}

#[test]
fn test_completion_unsupported_shell() {
    collrep_cmd()
        .args(["completion", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported shell"));
}

// ===== Replay =====

#[cfg(unix)]
fn install_script(harness: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(harness).unwrap();
    let path = harness.join("install.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_replay_runs_harness_and_collects_log() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());
    install_script(&dir.path().join("rccl-tests"), "exit 0");

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "replay",
            "--nccl-debug-log",
            &log,
            "--platform",
            "rocm",
            "--prefix",
            "echo ",
            "--skip-summary",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished dumping all data"));

    assert!(dir.path().join("net_unique.sh").exists());
    assert!(dir.path().join("net_counts.csv").exists());
    assert!(dir.path().join("rccl-tests/net_unique.sh").exists());
    assert!(!dir.path().join("rccl-tests/rccl_perf_log.txt").exists());

    let perf = fs::read_to_string(dir.path().join("rccl_perf_log.txt")).unwrap();
    assert_eq!(
        perf,
        "all_reduce_perf -d float -b 4096 -e 4096 -o sum -g 2\n\
         broadcast_perf -d int8 -b 256 -e 256 -o sum -g 2\n"
    );
}

#[cfg(unix)]
#[test]
fn test_replay_stops_when_build_fails() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, &two_rank_log());
    install_script(&dir.path().join("rccl-tests"), "exit 1");

    collrep_cmd()
        .current_dir(dir.path())
        .args([
            "replay",
            "--nccl-debug-log",
            &log,
            "--platform",
            "rocm",
            "--prefix",
            "echo ",
            "--skip-summary",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Building rccl-tests failed"));

    assert!(!dir.path().join("rccl_perf_log.txt").exists());
}
