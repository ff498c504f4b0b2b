//! Live-environment checks over container runtime facts.
//!
//! Gateway-scoped checks fail closed: any inability to obtain the fact is a
//! failure. Sandbox-scoped checks are the exception: the sandbox service is
//! optional, so they skip when it is disabled by deployment mode and warn
//! when the runtime cannot be queried.

use crate::engine::{Catalog, Check};
use crate::model::{Fact, PostureModel};
use crate::policy::EffectiveConfig;
use gateguard_types::{Outcome, ids};
use serde_json::json;

pub fn register(cfg: &EffectiveConfig, catalog: &mut Catalog) {
    let entries: [(&'static str, &'static str, crate::engine::EvalFn); 9] = [
        (ids::CHECK_RUNTIME_GATEWAY_RUNNING, "gateway container running", eval_gateway_running),
        (ids::CHECK_RUNTIME_NON_ROOT_USER, "gateway runs as non-root", eval_non_root_user),
        (ids::CHECK_RUNTIME_CAPS_DROPPED, "linux capabilities dropped", eval_caps_dropped),
        (
            ids::CHECK_RUNTIME_NO_SENSITIVE_MOUNTS,
            "no sensitive host mounts",
            eval_no_sensitive_mounts,
        ),
        (ids::CHECK_RUNTIME_READONLY_ROOTFS, "read-only root filesystem", eval_readonly_rootfs),
        (ids::CHECK_RUNTIME_LOOPBACK_BIND, "ports bound to loopback only", eval_loopback_bind),
        (ids::CHECK_RUNTIME_SANDBOX_RUNNING, "sandbox container running", eval_sandbox_running),
        (
            ids::CHECK_RUNTIME_SANDBOX_REACHABLE,
            "sandbox reaches the gateway",
            eval_sandbox_reachable,
        ),
        (ids::CHECK_RUNTIME_SECURITY_AUDIT, "delegated security audit clean", eval_security_audit),
    ];

    for (id, label, eval) in entries {
        if cfg.check_policy(id).is_some() {
            catalog.register(Check { id, label, eval });
        }
    }
}

/// Gateway-scoped facts fail closed when unavailable.
fn gateway_fact<'a, T>(fact: &'a Fact<T>) -> Result<&'a T, Outcome> {
    match fact {
        Fact::Available(v) => Ok(v),
        Fact::Unavailable(reason) => {
            Err(Outcome::fail(ids::CODE_FACT_UNAVAILABLE, reason.clone()))
        }
    }
}

/// Sandbox-scoped facts: Skip when the sandbox is disabled by deployment
/// mode, Warn when the runtime cannot be queried.
fn sandbox_fact<'a, T>(model: &PostureModel, fact: &'a Fact<T>) -> Result<&'a T, Outcome> {
    if !model.runtime.sandbox.enabled {
        return Err(Outcome::skip(
            ids::CODE_SANDBOX_DISABLED,
            "sandbox service disabled by deployment mode",
        ));
    }
    match fact {
        Fact::Available(v) => Ok(v),
        Fact::Unavailable(reason) => {
            Err(Outcome::warn(ids::CODE_RUNTIME_UNAVAILABLE, reason.clone()))
        }
    }
}

fn eval_gateway_running(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let running = match gateway_fact(&model.runtime.gateway.running) {
        Ok(v) => *v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if running {
        Outcome::pass()
    } else {
        Outcome::fail(ids::CODE_NOT_RUNNING, "gateway container is not running")
    })
}

fn eval_non_root_user(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let uid = match gateway_fact(&model.runtime.gateway.uid) {
        Ok(v) => *v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if uid == 0 {
        Outcome::fail(ids::CODE_ROOT_USER, "gateway runs as uid 0")
    } else {
        Outcome::pass().with_data(json!({ "uid": uid }))
    })
}

fn eval_caps_dropped(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let cap_drop = match gateway_fact(&model.runtime.gateway.cap_drop) {
        Ok(v) => v,
        Err(outcome) => return Ok(outcome),
    };
    let all_dropped = cap_drop.iter().any(|c| c.eq_ignore_ascii_case("ALL"));
    Ok(if all_dropped {
        Outcome::pass()
    } else {
        Outcome::fail(
            ids::CODE_CAPS_NOT_DROPPED,
            format!("cap_drop is [{}], expected to include ALL", cap_drop.join(", ")),
        )
    })
}

fn eval_no_sensitive_mounts(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let mounts = match gateway_fact(&model.runtime.gateway.mounts) {
        Ok(v) => v,
        Err(outcome) => return Ok(outcome),
    };
    let forbidden: Vec<&str> = mounts
        .iter()
        .map(|m| m.source.as_str())
        .filter(|src| {
            cfg.expect
                .forbidden_mount_sources
                .iter()
                .any(|f| src == f || src.starts_with(&format!("{f}/")))
        })
        .collect();
    Ok(if forbidden.is_empty() {
        Outcome::pass().with_data(json!({ "mountCount": mounts.len() }))
    } else {
        Outcome::fail(
            ids::CODE_SENSITIVE_MOUNT,
            format!("forbidden host sources mounted: {}", forbidden.join(", ")),
        )
        .with_data(json!({ "sources": forbidden }))
    })
}

fn eval_readonly_rootfs(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let readonly = match gateway_fact(&model.runtime.gateway.readonly_rootfs) {
        Ok(v) => *v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if readonly {
        Outcome::pass()
    } else {
        Outcome::fail(ids::CODE_ROOTFS_WRITABLE, "root filesystem is writable")
    })
}

fn eval_loopback_bind(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let bindings = match gateway_fact(&model.runtime.gateway.port_bindings) {
        Ok(v) => v,
        Err(outcome) => return Ok(outcome),
    };
    // An empty host ip publishes on all interfaces.
    let public: Vec<String> = bindings
        .iter()
        .filter(|b| {
            b.host_ip.is_empty() || !cfg.expect.loopback_hosts.iter().any(|h| h == &b.host_ip)
        })
        .map(|b| {
            let host = if b.host_ip.is_empty() { "0.0.0.0" } else { &b.host_ip };
            format!("{host}:{}", b.host_port)
        })
        .collect();
    Ok(if public.is_empty() {
        Outcome::pass().with_data(json!({ "bindingCount": bindings.len() }))
    } else {
        Outcome::fail(
            ids::CODE_PUBLIC_BIND,
            format!("non-loopback bindings: {}", public.join(", ")),
        )
        .with_data(json!({ "bindings": public }))
    })
}

fn eval_sandbox_running(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let running = match sandbox_fact(model, &model.runtime.sandbox.running) {
        Ok(v) => *v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if running {
        Outcome::pass()
    } else {
        Outcome::fail(ids::CODE_NOT_RUNNING, "sandbox container is not running")
    })
}

fn eval_sandbox_reachable(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let reachable = match sandbox_fact(model, &model.runtime.sandbox.gateway_reachable) {
        Ok(v) => *v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if reachable {
        Outcome::pass()
    } else {
        Outcome::fail(
            ids::CODE_PROBE_FAILED,
            "probe from sandbox to gateway failed",
        )
    })
}

fn eval_security_audit(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let audit = match gateway_fact(&model.runtime.gateway.audit) {
        Ok(v) => v,
        Err(outcome) => return Ok(outcome),
    };
    Ok(if audit.critical == 0 {
        Outcome::pass()
    } else {
        Outcome::fail(
            ids::CODE_CRITICAL_FINDINGS,
            format!("audit reported {} critical findings", audit.critical),
        )
        .with_data(json!({ "critical": audit.critical }))
    })
}
