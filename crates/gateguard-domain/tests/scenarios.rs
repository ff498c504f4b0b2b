//! End-to-end engine scenarios: a hardened deployment, a single
//! configuration regression, and a fully absent runtime.

use gateguard_domain::model::{
    AuditSummary, Fact, FsModel, Mount, PathProbe, PortBinding, PostureModel,
};
use gateguard_domain::policy::{CheckPolicy, EffectiveConfig, Expectations, FailOn};
use gateguard_types::{Status, Verdict, explain, ids};
use std::collections::BTreeMap;

fn all_checks_enabled() -> BTreeMap<String, CheckPolicy> {
    explain::all_check_ids()
        .iter()
        .copied()
        .filter(|id| *id != ids::CHECK_TOOL_RUNTIME)
        .map(|id| (id.to_string(), CheckPolicy::enabled()))
        .collect()
}

fn strict_config() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Fail,
        expect: Expectations::default(),
        checks: all_checks_enabled(),
    }
}

fn probe(path: &str, mode: u32) -> PathProbe {
    PathProbe {
        path: path.to_string(),
        mode: Some(mode),
    }
}

fn hardened_fs() -> FsModel {
    FsModel {
        state_dir: probe("/home/op/.gateway", 0o700),
        config_file: probe("/home/op/.gateway/gateway.json", 0o600),
        workspace_dir: probe("/home/op/.gateway/workspace", 0o700),
        env_file: probe("/home/op/.gateway/.env", 0o600),
    }
}

fn hardened_doc(allow_from: &str) -> Fact<gateguard_domain::model::GatewayDoc> {
    let json = format!(
        r#"{{
            "gateway": {{ "auth": {{ "mode": "token", "token": "{}" }} }},
            "channels": {{
                "telegram": {{
                    "dmPolicy": "allowlist",
                    "allowFrom": {allow_from},
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
    Fact::Available(serde_json::from_str(&json).expect("valid doc"))
}

fn hardened_model() -> PostureModel {
    let mut model = PostureModel {
        fs: hardened_fs(),
        config: hardened_doc(r#"["123"]"#),
        ..PostureModel::default()
    };
    model.runtime.gateway.running = Fact::Available(true);
    model.runtime.gateway.uid = Fact::Available(1000);
    model.runtime.gateway.cap_drop = Fact::Available(vec!["ALL".to_string()]);
    model.runtime.gateway.mounts = Fact::Available(vec![Mount {
        source: "/var/lib/docker/volumes/gw/_data".to_string(),
        destination: "/data".to_string(),
    }]);
    model.runtime.gateway.readonly_rootfs = Fact::Available(true);
    model.runtime.gateway.port_bindings = Fact::Available(vec![PortBinding {
        container_port: "8790/tcp".to_string(),
        host_ip: "127.0.0.1".to_string(),
        host_port: "8790".to_string(),
    }]);
    model.runtime.gateway.audit = Fact::Available(AuditSummary { critical: 0 });
    model.runtime.sandbox.enabled = true;
    model.runtime.sandbox.running = Fact::Available(true);
    model.runtime.sandbox.gateway_reachable = Fact::Available(true);
    model
}

#[test]
fn hardened_deployment_passes_everything() {
    let report = gateguard_domain::evaluate(&hardened_model(), &strict_config());

    assert_eq!(report.counts.fail, 0);
    assert_eq!(report.counts.warn, 0);
    assert_eq!(report.counts.skip, 0);
    assert_eq!(report.verdict, Verdict::Pass);
    assert!(report.overall_success());
    // 4 fs + 8 config + 9 runtime
    assert_eq!(report.results.len(), 21);
}

#[test]
fn empty_allow_list_is_the_only_failure() {
    let baseline = gateguard_domain::evaluate(&hardened_model(), &strict_config());

    let mut model = hardened_model();
    model.config = hardened_doc("[]");
    let report = gateguard_domain::evaluate(&model, &strict_config());

    assert_eq!(report.counts.fail, baseline.counts.fail + 1);
    let failed: Vec<&str> = report
        .results
        .iter()
        .filter(|r| r.status == Status::Fail)
        .map(|r| r.check_id.as_str())
        .collect();
    assert_eq!(failed, vec![ids::CHECK_CONFIG_ALLOW_LIST]);
    assert_eq!(report.verdict, Verdict::Fail);
}

#[test]
fn absent_runtime_degrades_but_completes() {
    let mut model = hardened_model();
    let reason = "docker: command not found";
    model.runtime.gateway.running = Fact::unavailable(reason);
    model.runtime.gateway.uid = Fact::unavailable(reason);
    model.runtime.gateway.cap_drop = Fact::unavailable(reason);
    model.runtime.gateway.mounts = Fact::unavailable(reason);
    model.runtime.gateway.readonly_rootfs = Fact::unavailable(reason);
    model.runtime.gateway.port_bindings = Fact::unavailable(reason);
    model.runtime.gateway.audit = Fact::unavailable(reason);
    model.runtime.sandbox.running = Fact::unavailable(reason);
    model.runtime.sandbox.gateway_reachable = Fact::unavailable(reason);

    let report = gateguard_domain::evaluate(&model, &strict_config());

    // The run still produced every result.
    assert_eq!(report.results.len(), 21);

    for r in &report.results {
        match r.check_id.as_str() {
            id if id.starts_with("fs.") || id.starts_with("config.") => {
                assert_eq!(r.status, Status::Pass, "{id} should be unaffected");
            }
            ids::CHECK_RUNTIME_SANDBOX_RUNNING | ids::CHECK_RUNTIME_SANDBOX_REACHABLE => {
                assert_eq!(r.status, Status::Warn, "{} is optional", r.check_id);
            }
            _ => {
                assert_eq!(r.status, Status::Fail, "{} must fail closed", r.check_id);
                assert_eq!(r.code, ids::CODE_FACT_UNAVAILABLE);
            }
        }
    }

    assert_eq!(report.verdict, Verdict::Fail);
    assert!(!report.overall_success());
}
