//! End-to-end CLI tests against temp state directories (no container
//! runtime involved: these run under the config-only profile).

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a Command for the gateguard binary.
#[allow(deprecated)]
fn gateguard_cmd() -> Command {
    Command::cargo_bin("gateguard").expect("gateguard binary not found")
}

fn hardened_doc() -> String {
    format!(
        r#"{{
            "gateway": {{ "auth": {{ "mode": "token", "token": "{}" }} }},
            "channels": {{
                "telegram": {{
                    "dmPolicy": "allowlist",
                    "allowFrom": ["123456789"],
                    "groupPolicy": "disabled"
                }}
            }},
            "tools": {{
                "fs": {{ "workspaceOnly": true }},
                "exec": {{ "applyPatch": {{ "workspaceOnly": true }} }}
            }},
            "logging": {{ "redactSensitive": "tools" }}
        }}"#,
        "a".repeat(32)
    )
}

/// Provision a state directory with hardened permissions and config.
fn hardened_state_dir(doc: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let root = tmp.path().join("state");
    std::fs::create_dir(&root).expect("mkdir state");
    std::fs::set_permissions(&root, Permissions::from_mode(0o700)).expect("chmod state");

    std::fs::write(root.join("gateway.json"), doc).expect("write config");
    std::fs::set_permissions(root.join("gateway.json"), Permissions::from_mode(0o600))
        .expect("chmod config");

    std::fs::create_dir(root.join("workspace")).expect("mkdir workspace");
    std::fs::set_permissions(root.join("workspace"), Permissions::from_mode(0o700))
        .expect("chmod workspace");

    std::fs::write(root.join(".env"), "GATEWAY_TOKEN=redacted\n").expect("write env");
    std::fs::set_permissions(root.join(".env"), Permissions::from_mode(0o600)).expect("chmod env");

    (tmp, root)
}

fn run_check(state_dir: &Path, report_out: &Path) -> assert_cmd::assert::Assert {
    gateguard_cmd()
        .arg("--state-dir")
        .arg(state_dir)
        .arg("--profile")
        .arg("config-only")
        .arg("check")
        .arg("--report-out")
        .arg(report_out)
        .assert()
}

#[test]
fn hardened_state_dir_passes_config_only_checklist() {
    let (tmp, root) = hardened_state_dir(&hardened_doc());
    let report_out = tmp.path().join("report.json");

    run_check(&root, &report_out)
        .success()
        .stdout(predicate::str::contains("PASS state directory permissions"))
        .stdout(predicate::str::contains("PASS sender allow-list populated"))
        .stdout(predicate::str::contains(
            "summary: 12 passed, 0 failed, 0 warned (0 skipped)",
        ))
        .stdout(predicate::str::contains("posture check passed"));

    let report: Value = serde_json::from_str(
        &std::fs::read_to_string(&report_out).expect("read report"),
    )
    .expect("parse report");
    let report = gateguard_test_util::normalize_nondeterministic(report);

    assert_eq!(report["schema"], "gateguard.report.v1");
    assert_eq!(report["tool"]["name"], "gateguard");
    assert_eq!(report["tool"]["version"], "__VERSION__");
    assert_eq!(report["started_at"], "__TIMESTAMP__");
    assert_eq!(report["verdict"], "pass");
    assert_eq!(report["results"].as_array().expect("results").len(), 12);
    assert_eq!(report["data"]["counts"]["fail"], 0);
    assert_eq!(report["data"]["profile"], "config-only");
}

#[test]
fn loose_config_file_permissions_fail_the_run() {
    let (tmp, root) = hardened_state_dir(&hardened_doc());
    std::fs::set_permissions(root.join("gateway.json"), Permissions::from_mode(0o644))
        .expect("chmod config");
    let report_out = tmp.path().join("report.json");

    run_check(&root, &report_out)
        .code(1)
        .stdout(predicate::str::contains(
            "FAIL gateway config file permissions: got 644, expected 600",
        ))
        .stdout(predicate::str::contains("posture check FAILED"));
}

#[test]
fn empty_allow_list_is_the_only_failure() {
    let doc = hardened_doc().replace(r#"["123456789"]"#, "[]");
    let (tmp, root) = hardened_state_dir(&doc);
    let report_out = tmp.path().join("report.json");

    run_check(&root, &report_out)
        .code(1)
        .stdout(predicate::str::contains("FAIL sender allow-list populated"))
        .stdout(predicate::str::contains(
            "summary: 11 passed, 1 failed, 0 warned (0 skipped)",
        ));
}

#[test]
fn missing_gateway_config_fails_every_config_check() {
    let (tmp, root) = hardened_state_dir(&hardened_doc());
    std::fs::remove_file(root.join("gateway.json")).expect("remove config");
    let report_out = tmp.path().join("report.json");

    // One fs check (config file mode) + eight config checks fail closed.
    run_check(&root, &report_out)
        .code(1)
        .stdout(predicate::str::contains(
            "summary: 3 passed, 9 failed, 0 warned (0 skipped)",
        ));
}

#[test]
fn md_renders_from_a_written_report() {
    let (tmp, root) = hardened_state_dir(&hardened_doc());
    let report_out = tmp.path().join("report.json");
    run_check(&root, &report_out).success();

    gateguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_out)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Gateguard posture report"))
        .stdout(predicate::str::contains("Verdict: **PASS**"));
}

#[test]
fn explain_known_and_unknown_identifiers() {
    gateguard_cmd()
        .args(["explain", "config.allow_list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sender Allow-List Populated"));

    gateguard_cmd()
        .args(["explain", "no.such_check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown check_id or code"));
}
