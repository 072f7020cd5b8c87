// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenario tests (S1-S8) driving the built `lcm`
//! binary against its embedded default topology/inventory
//! (`host/1` = `lnet_up`, `target/7` = `unmounted`). Each test opens a
//! fresh store in its own temp directory so scenarios never interact.

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    store_dir: std::path::PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let store_dir = dir.path().join("store");
        Self { _dir: dir, store_dir }
    }

    fn lcm(&self) -> Command {
        let mut cmd = Command::cargo_bin("lcm").expect("lcm binary builds");
        cmd.env("LCM_STORE_DIR", &self.store_dir);
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.lcm().args(args).output().expect("lcm runs");
        assert!(output.status.success(), "lcm {args:?} failed: {}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }
}

/// S1 - trivial no-op: `host/1` is already `lnet_up`.
#[test]
fn s1_trivial_noop_still_creates_a_command() {
    let harness = Harness::new();
    let response = harness.json(&["set-state", "host/1=lnet_up", "--message", "noop"]);
    assert!(response["command_id"].as_str().expect("command_id").starts_with("cmd-"));
}

/// S2 - single hop: `target/7` `unmounted -> mounted`, host already up, so
/// the plan is exactly one write lock on the target.
#[test]
fn s2_single_hop_locks_the_target_for_write() {
    let harness = Harness::new();
    harness.json(&["set-state", "target/7=mounted", "--message", "mount target/7"]);

    let locks = harness.json(&["get-locks", "target/7"]);
    let write = locks["locks"]["write"].as_array().expect("write locks array");
    assert_eq!(write.len(), 1);
    assert!(locks["locks"]["read"].as_array().expect("read locks array").is_empty());
}

/// S6 - two sequential commands against the same object: the second set-state
/// still succeeds and is tracked as its own Command once the first persists.
#[test]
fn s6_sequential_commands_both_persist() {
    let harness = Harness::new();
    let first = harness.json(&["set-state", "target/7=mounted", "--message", "mount"]);
    let second = harness.json(&["set-state", "target/7=unmounted", "--message", "unmount"]);

    assert_ne!(first["command_id"], second["command_id"]);
    let locks = harness.json(&["get-locks", "target/7"]);
    assert_eq!(locks["locks"]["write"].as_array().expect("write locks array").len(), 2);
}

/// S7 - consequences preview: `get_transition_consequences(target/7, mounted)`
/// on a fresh system returns the mount job and writes nothing.
#[test]
fn s7_consequences_preview_writes_nothing() {
    let harness = Harness::new();
    let response = harness.json(&["get-transition-consequences", "target/7", "mounted"]);

    let consequences = &response["consequences"];
    assert_eq!(consequences["transition_job"]["class_name"], "mount_target");
    assert!(consequences["dependency_jobs"].as_array().expect("dependency_jobs array").is_empty());

    // Nothing was persisted: the target still has no locks.
    let locks = harness.json(&["get-locks", "target/7"]);
    assert!(locks["locks"]["write"].as_array().expect("write locks array").is_empty());
}

/// `available-transitions`/`available-jobs` agree on the direct-hop case:
/// `target/7` can directly reach `mounted` from `unmounted`.
#[test]
fn available_jobs_surfaces_the_direct_hop_only() {
    let harness = Harness::new();
    let transitions = harness.json(&["available-transitions", "target/7"]);
    let states = transitions["results"][0]["states"].as_array().expect("states array");
    let state_names: Vec<&str> = states.iter().map(|s| s.as_str().expect("string state")).collect();
    assert!(state_names.contains(&"mounted"));

    let jobs = harness.json(&["available-jobs", "target/7"]);
    let classes: Vec<&str> = jobs["results"][0]["jobs"]
        .as_array()
        .expect("jobs array")
        .iter()
        .map(|j| j["class_name"].as_str().expect("class_name"))
        .collect();
    assert_eq!(classes, vec!["mount_target"]);
}
