//! Full strict-profile runs against a stub docker binary on PATH, plus the
//! degraded run with no container tool at all.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DOCKER_STUB: &str = r#"#!/bin/sh
cmd="$1"; shift
case "$cmd" in
  inspect)
    name="$1"
    if [ "$name" = "gateway" ]; then
      cat <<'EOF'
[ { "State": { "Running": true },
    "HostConfig": {
      "CapDrop": ["ALL"],
      "ReadonlyRootfs": true,
      "PortBindings": { "8790/tcp": [ { "HostIp": "127.0.0.1", "HostPort": "8790" } ] }
    },
    "Mounts": [ { "Source": "/var/lib/docker/volumes/gw/_data", "Destination": "/data" } ] } ]
EOF
    else
      printf '[ { "State": { "Running": true } } ]\n'
    fi
    ;;
  exec)
    shift
    tool="$1"
    case "$tool" in
      id) printf '1000\n' ;;
      gateway) printf '{ "summary": { "critical": 0 } }\n' ;;
      curl) exit 0 ;;
      *) exit 1 ;;
    esac
    ;;
  *) exit 1 ;;
esac
"#;

/// Helper to get a Command for the gateguard binary.
#[allow(deprecated)]
fn gateguard_cmd() -> Command {
    Command::cargo_bin("gateguard").expect("gateguard binary not found")
}

fn hardened_state_dir(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().join("state");
    std::fs::create_dir(&root).expect("mkdir state");
    std::fs::set_permissions(&root, Permissions::from_mode(0o700)).expect("chmod state");

    let doc = format!(
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
    );
    std::fs::write(root.join("gateway.json"), doc).expect("write config");
    std::fs::set_permissions(root.join("gateway.json"), Permissions::from_mode(0o600))
        .expect("chmod config");
    std::fs::create_dir(root.join("workspace")).expect("mkdir workspace");
    std::fs::set_permissions(root.join("workspace"), Permissions::from_mode(0o700))
        .expect("chmod workspace");
    std::fs::write(root.join(".env"), "GATEWAY_TOKEN=redacted\n").expect("write env");
    std::fs::set_permissions(root.join(".env"), Permissions::from_mode(0o600)).expect("chmod env");

    root
}

/// A bin dir containing only the docker stub; prepended to PATH.
fn stub_bin_dir(tmp: &TempDir) -> PathBuf {
    let bin = tmp.path().join("bin");
    std::fs::create_dir(&bin).expect("mkdir bin");
    let stub = bin.join("docker");
    std::fs::write(&stub, DOCKER_STUB).expect("write stub");
    std::fs::set_permissions(&stub, Permissions::from_mode(0o755)).expect("chmod stub");
    bin
}

fn path_with(bin: &Path) -> String {
    let inherited = std::env::var("PATH").unwrap_or_default();
    format!("{}:{inherited}", bin.display())
}

#[test]
fn strict_run_passes_against_hardened_stub_runtime() {
    let tmp = TempDir::new().expect("temp dir");
    let root = hardened_state_dir(&tmp);
    let bin = stub_bin_dir(&tmp);
    let report_out = tmp.path().join("report.json");

    gateguard_cmd()
        .env("PATH", path_with(&bin))
        .arg("--state-dir")
        .arg(&root)
        .arg("check")
        .arg("--report-out")
        .arg(&report_out)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS gateway container running"))
        .stdout(predicate::str::contains("PASS gateway runs as non-root"))
        .stdout(predicate::str::contains("PASS ports bound to loopback only"))
        .stdout(predicate::str::contains("PASS delegated security audit clean"))
        .stdout(predicate::str::contains(
            "summary: 21 passed, 0 failed, 0 warned (0 skipped)",
        ));
}

#[test]
fn absent_container_tool_degrades_runtime_checks_without_crashing() {
    let tmp = TempDir::new().expect("temp dir");
    let root = hardened_state_dir(&tmp);
    // An empty bin dir: the gateguard binary is invoked directly, but its
    // docker spawn sees no tool on PATH.
    let empty_bin = tmp.path().join("empty-bin");
    std::fs::create_dir(&empty_bin).expect("mkdir empty bin");
    let report_out = tmp.path().join("report.json");

    gateguard_cmd()
        .env("PATH", empty_bin.display().to_string())
        .arg("--state-dir")
        .arg(&root)
        .arg("check")
        .arg("--report-out")
        .arg(&report_out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL gateway container running"))
        .stdout(predicate::str::contains("WARN sandbox container running"))
        .stdout(predicate::str::contains(
            "summary: 12 passed, 7 failed, 2 warned (0 skipped)",
        ));
}

#[test]
fn no_sandbox_flag_skips_sandbox_checks() {
    let tmp = TempDir::new().expect("temp dir");
    let root = hardened_state_dir(&tmp);
    let bin = stub_bin_dir(&tmp);
    let report_out = tmp.path().join("report.json");

    gateguard_cmd()
        .env("PATH", path_with(&bin))
        .arg("--state-dir")
        .arg(&root)
        .arg("--no-sandbox")
        .arg("check")
        .arg("--report-out")
        .arg(&report_out)
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIP sandbox container running"))
        .stdout(predicate::str::contains(
            "summary: 19 passed, 0 failed, 0 warned (2 skipped)",
        ));
}

#[test]
fn critical_audit_findings_fail_the_strict_run() {
    let tmp = TempDir::new().expect("temp dir");
    let root = hardened_state_dir(&tmp);
    let bin = stub_bin_dir(&tmp);
    // Same stub, but the audit reports two critical findings.
    let stub = bin.join("docker");
    let script = DOCKER_STUB.replace(r#""critical": 0"#, r#""critical": 2"#);
    std::fs::write(&stub, script).expect("rewrite stub");
    std::fs::set_permissions(&stub, Permissions::from_mode(0o755)).expect("chmod stub");
    let report_out = tmp.path().join("report.json");

    gateguard_cmd()
        .env("PATH", path_with(&bin))
        .arg("--state-dir")
        .arg(&root)
        .arg("check")
        .arg("--report-out")
        .arg(&report_out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAIL delegated security audit clean: audit reported 2 critical findings",
        ));
}
