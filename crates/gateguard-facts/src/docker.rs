//! Container-runtime introspection via the docker CLI.
//!
//! Facts come from `docker inspect` (parsed as a typed partial document) and
//! `docker exec` (uid, reachability probe, delegated audit). Every probe
//! failure is captured as an `Unavailable` reason; nothing here aborts the
//! run.

use gateguard_domain::model::{
    AuditSummary, Fact, GatewayRuntime, Mount, PortBinding, RuntimeModel, SandboxRuntime,
};
use gateguard_settings::GatherPlan;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}: command not found")]
    ToolMissing(String),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("parse `{command}` output: {source}")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{command}` returned no objects")]
    Empty { command: String },
}

/// Thin wrapper over the docker binary (name configurable for podman-style
/// drop-ins).
#[derive(Clone, Debug)]
pub struct DockerCli {
    bin: String,
}

impl DockerCli {
    pub fn new(bin: &str) -> Self {
        Self {
            bin: bin.to_string(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, ProbeError> {
        let command = format!("{} {}", self.bin, args.join(" "));
        let output = match Command::new(&self.bin).args(args).output() {
            Ok(output) => output,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProbeError::ToolMissing(self.bin.clone()));
            }
            Err(err) => {
                return Err(ProbeError::CommandFailed {
                    command,
                    stderr: err.to_string(),
                });
            }
        };
        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// `docker inspect <container>`, reduced to the fields the checks read.
    pub fn inspect(&self, container: &str) -> Result<InspectDoc, ProbeError> {
        let command = format!("{} inspect {container}", self.bin);
        let stdout = self.run(&["inspect", container])?;
        parse_inspect_output(&command, &stdout)
    }

    /// `docker exec <container> <argv...>`, returning stdout on success.
    pub fn exec_stdout(&self, container: &str, argv: &[String]) -> Result<String, ProbeError> {
        let mut args = vec!["exec", container];
        args.extend(argv.iter().map(String::as_str));
        self.run(&args)
    }

    /// `docker exec <container> <argv...>`, caring only whether the command
    /// exits zero. A non-zero exit is an observed `false`, not a probe
    /// failure; only an unspawnable tool is.
    pub fn exec_succeeds(&self, container: &str, argv: &[String]) -> Result<bool, ProbeError> {
        let command = format!("{} exec {container} {}", self.bin, argv.join(" "));
        let mut cmd = Command::new(&self.bin);
        cmd.arg("exec").arg(container).args(argv);
        match cmd.output() {
            Ok(output) => Ok(output.status.success()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ProbeError::ToolMissing(self.bin.clone()))
            }
            Err(err) => Err(ProbeError::CommandFailed {
                command,
                stderr: err.to_string(),
            }),
        }
    }
}

/// The slice of `docker inspect` output the checks consume.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InspectDoc {
    #[serde(rename = "State", default)]
    pub state: InspectState,
    #[serde(rename = "HostConfig", default)]
    pub host_config: InspectHostConfig,
    #[serde(rename = "Mounts", default)]
    pub mounts: Vec<InspectMount>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InspectState {
    #[serde(rename = "Running", default)]
    pub running: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InspectHostConfig {
    /// docker emits `null` rather than `[]` when nothing was dropped.
    #[serde(rename = "CapDrop", default)]
    pub cap_drop: Option<Vec<String>>,
    #[serde(rename = "ReadonlyRootfs", default)]
    pub readonly_rootfs: bool,
    #[serde(rename = "PortBindings", default)]
    pub port_bindings: Option<BTreeMap<String, Option<Vec<InspectHostBinding>>>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InspectHostBinding {
    #[serde(rename = "HostIp", default)]
    pub host_ip: String,
    #[serde(rename = "HostPort", default)]
    pub host_port: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InspectMount {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Destination", default)]
    pub destination: String,
}

/// `docker inspect` prints a JSON array; one object per inspected container.
pub fn parse_inspect_output(command: &str, stdout: &str) -> Result<InspectDoc, ProbeError> {
    let docs: Vec<InspectDoc> =
        serde_json::from_str(stdout).map_err(|source| ProbeError::Parse {
            command: command.to_string(),
            source,
        })?;
    docs.into_iter().next().ok_or_else(|| ProbeError::Empty {
        command: command.to_string(),
    })
}

fn mounts_of(doc: &InspectDoc) -> Vec<Mount> {
    doc.mounts
        .iter()
        .map(|m| Mount {
            source: m.source.clone(),
            destination: m.destination.clone(),
        })
        .collect()
}

fn port_bindings_of(doc: &InspectDoc) -> Vec<PortBinding> {
    let Some(bindings) = &doc.host_config.port_bindings else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (container_port, hosts) in bindings {
        for host in hosts.iter().flatten() {
            out.push(PortBinding {
                container_port: container_port.clone(),
                host_ip: host.host_ip.clone(),
                host_port: host.host_port.clone(),
            });
        }
    }
    out
}

/// Shape of the delegated audit's JSON output; only the summary is read.
#[derive(Debug, Deserialize)]
struct AuditDoc {
    summary: AuditSummaryDoc,
}

#[derive(Debug, Deserialize)]
struct AuditSummaryDoc {
    critical: u64,
}

fn parse_audit_output(command: &str, stdout: &str) -> Result<AuditSummary, ProbeError> {
    let doc: AuditDoc = serde_json::from_str(stdout).map_err(|source| ProbeError::Parse {
        command: command.to_string(),
        source,
    })?;
    Ok(AuditSummary {
        critical: doc.summary.critical,
    })
}

/// Gather every runtime fact in the plan. Each fact degrades independently.
pub fn build_runtime_model(plan: &GatherPlan) -> RuntimeModel {
    let docker = DockerCli::new(&plan.docker_bin);
    RuntimeModel {
        gateway: gather_gateway(&docker, plan),
        sandbox: gather_sandbox(&docker, plan),
    }
}

fn gather_gateway(docker: &DockerCli, plan: &GatherPlan) -> GatewayRuntime {
    let mut rt = GatewayRuntime::default();

    match docker.inspect(&plan.gateway_container) {
        Ok(doc) => {
            rt.running = Fact::Available(doc.state.running);
            rt.cap_drop = Fact::Available(doc.host_config.cap_drop.clone().unwrap_or_default());
            rt.mounts = Fact::Available(mounts_of(&doc));
            rt.readonly_rootfs = Fact::Available(doc.host_config.readonly_rootfs);
            rt.port_bindings = Fact::Available(port_bindings_of(&doc));
        }
        Err(err) => {
            let reason = err.to_string();
            rt.running = Fact::unavailable(&reason);
            rt.cap_drop = Fact::unavailable(&reason);
            rt.mounts = Fact::unavailable(&reason);
            rt.readonly_rootfs = Fact::unavailable(&reason);
            rt.port_bindings = Fact::unavailable(&reason);
        }
    }

    let id_argv = vec!["id".to_string(), "-u".to_string()];
    rt.uid = match docker.exec_stdout(&plan.gateway_container, &id_argv) {
        Ok(stdout) => match stdout.trim().parse::<u32>() {
            Ok(uid) => Fact::Available(uid),
            Err(_) => Fact::unavailable(format!("unexpected id -u output: {}", stdout.trim())),
        },
        Err(err) => Fact::unavailable(err.to_string()),
    };

    let audit_cmdline = format!(
        "{} exec {} {}",
        plan.docker_bin,
        plan.gateway_container,
        plan.audit_command.join(" ")
    );
    rt.audit = match docker.exec_stdout(&plan.gateway_container, &plan.audit_command) {
        Ok(stdout) => match parse_audit_output(&audit_cmdline, &stdout) {
            Ok(summary) => Fact::Available(summary),
            Err(err) => Fact::unavailable(err.to_string()),
        },
        Err(err) => Fact::unavailable(err.to_string()),
    };

    rt
}

fn gather_sandbox(docker: &DockerCli, plan: &GatherPlan) -> SandboxRuntime {
    let mut rt = SandboxRuntime {
        enabled: plan.sandbox_enabled,
        ..SandboxRuntime::default()
    };
    // Nothing to probe when the deployment mode has no sandbox; the checks
    // skip before reading these facts.
    if !plan.sandbox_enabled {
        return rt;
    }

    rt.running = match docker.inspect(&plan.sandbox_container) {
        Ok(doc) => Fact::Available(doc.state.running),
        Err(err) => Fact::unavailable(err.to_string()),
    };

    rt.gateway_reachable = match docker.exec_succeeds(&plan.sandbox_container, &plan.probe_command)
    {
        Ok(ok) => Fact::Available(ok),
        Err(err) => Fact::unavailable(err.to_string()),
    };

    rt
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDENED_INSPECT: &str = r#"[
        {
            "Id": "5aa1e3f0",
            "State": { "Status": "running", "Running": true, "Pid": 4242 },
            "HostConfig": {
                "CapDrop": ["ALL"],
                "ReadonlyRootfs": true,
                "PortBindings": {
                    "8790/tcp": [ { "HostIp": "127.0.0.1", "HostPort": "8790" } ]
                }
            },
            "Mounts": [
                {
                    "Type": "volume",
                    "Source": "/var/lib/docker/volumes/gateway-state/_data",
                    "Destination": "/data"
                }
            ]
        }
    ]"#;

    #[test]
    fn parses_the_fields_the_checks_read() {
        let doc = parse_inspect_output("docker inspect gateway", HARDENED_INSPECT).expect("parse");
        assert!(doc.state.running);
        assert_eq!(doc.host_config.cap_drop.as_deref(), Some(&["ALL".to_string()][..]));
        assert!(doc.host_config.readonly_rootfs);

        let bindings = port_bindings_of(&doc);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].host_ip, "127.0.0.1");
        assert_eq!(bindings[0].host_port, "8790");
        assert_eq!(bindings[0].container_port, "8790/tcp");

        let mounts = mounts_of(&doc);
        assert_eq!(mounts[0].destination, "/data");
    }

    #[test]
    fn null_cap_drop_and_bindings_are_tolerated() {
        let doc = parse_inspect_output(
            "docker inspect gateway",
            r#"[ { "State": { "Running": false },
                  "HostConfig": { "CapDrop": null, "PortBindings": null } } ]"#,
        )
        .expect("parse");
        assert!(!doc.state.running);
        assert_eq!(doc.host_config.cap_drop, None);
        assert!(port_bindings_of(&doc).is_empty());
        assert!(mounts_of(&doc).is_empty());
    }

    #[test]
    fn empty_inspect_array_is_an_error() {
        let err = parse_inspect_output("docker inspect gateway", "[]").expect_err("empty");
        assert!(err.to_string().contains("no objects"));
    }

    #[test]
    fn malformed_inspect_output_is_a_parse_error() {
        let err = parse_inspect_output("docker inspect gateway", "not json").expect_err("parse");
        assert!(err.to_string().contains("docker inspect gateway"));
    }

    #[test]
    fn audit_summary_reads_critical_count() {
        let summary = parse_audit_output(
            "docker exec gateway gateway security audit --json",
            r#"{ "findings": [ { "id": "GW-101", "severity": "critical" } ],
                 "summary": { "critical": 1, "warn": 3, "info": 9 } }"#,
        )
        .expect("parse");
        assert_eq!(summary.critical, 1);
    }

    #[test]
    fn missing_tool_surfaces_as_tool_missing() {
        let docker = DockerCli::new("gateguard-test-no-such-binary");
        let err = docker.inspect("gateway").expect_err("missing tool");
        assert!(matches!(err, ProbeError::ToolMissing(_)));
        assert!(err.to_string().contains("command not found"));
    }

    #[test]
    fn missing_tool_model_degrades_every_fact() {
        let plan = GatherPlan {
            docker_bin: "gateguard-test-no-such-binary".to_string(),
            ..GatherPlan::default()
        };
        let model = build_runtime_model(&plan);
        assert!(model.gateway.running.reason().is_some());
        assert!(model.gateway.uid.reason().is_some());
        assert!(model.gateway.audit.reason().is_some());
        assert!(model.sandbox.enabled);
        assert!(model.sandbox.running.reason().is_some());
        assert!(model.sandbox.gateway_reachable.reason().is_some());
    }
}
