use crate::{model::GateguardConfigV1, presets};
use anyhow::Context;
use gateguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
    pub sandbox_enabled: Option<bool>,
}

/// Gathering parameters consumed by the facts layer: where things live and
/// how to reach the container runtime.
#[derive(Clone, Debug)]
pub struct GatherPlan {
    pub config_file: String,
    pub env_file: String,
    pub workspace_dir: String,

    pub docker_bin: String,
    pub gateway_container: String,
    pub sandbox_container: String,
    pub sandbox_enabled: bool,

    pub probe_command: Vec<String>,
    pub audit_command: Vec<String>,
}

impl Default for GatherPlan {
    fn default() -> Self {
        Self {
            config_file: "gateway.json".to_string(),
            env_file: ".env".to_string(),
            workspace_dir: "workspace".to_string(),
            docker_bin: "docker".to_string(),
            gateway_container: "gateway".to_string(),
            sandbox_container: "sandbox".to_string(),
            sandbox_enabled: true,
            probe_command: vec![
                "curl".to_string(),
                "-fsS".to_string(),
                "http://gateway:8790/health".to_string(),
            ],
            audit_command: vec![
                "gateway".to_string(),
                "security".to_string(),
                "audit".to_string(),
                "--json".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub gather: GatherPlan,
}

pub fn resolve_config(
    cfg: GateguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // fail_on: config first, CLI override wins
    if let Some(fail_on_s) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    // expected permission bits
    if let Some(mode) = cfg.paths.state_dir_mode.as_deref() {
        effective.expect.state_dir_mode = parse_mode(mode).context("paths.state_dir_mode")?;
    }
    if let Some(mode) = cfg.paths.config_file_mode.as_deref() {
        effective.expect.config_file_mode = parse_mode(mode).context("paths.config_file_mode")?;
    }
    if let Some(mode) = cfg.paths.workspace_dir_mode.as_deref() {
        effective.expect.workspace_dir_mode =
            parse_mode(mode).context("paths.workspace_dir_mode")?;
    }
    if let Some(mode) = cfg.paths.env_file_mode.as_deref() {
        effective.expect.env_file_mode = parse_mode(mode).context("paths.env_file_mode")?;
    }

    // expected gateway values
    if let Some(v) = cfg.gateway.auth_mode.clone() {
        effective.expect.auth_mode = v;
    }
    if let Some(v) = cfg.gateway.min_token_length {
        effective.expect.min_token_length = v as usize;
    }
    if let Some(v) = cfg.gateway.dm_policy.clone() {
        effective.expect.dm_policy = v;
    }
    if let Some(v) = cfg.gateway.group_policy.clone() {
        effective.expect.group_policy = v;
    }
    if !cfg.gateway.redact_sensitive.is_empty() {
        effective.expect.redact_sensitive = cfg.gateway.redact_sensitive.clone();
    }
    if !cfg.runtime.forbidden_mount_sources.is_empty() {
        effective.expect.forbidden_mount_sources = cfg.runtime.forbidden_mount_sources.clone();
    }
    if !cfg.runtime.loopback_hosts.is_empty() {
        effective.expect.loopback_hosts = cfg.runtime.loopback_hosts.clone();
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
    }

    // gathering plan
    let mut gather = GatherPlan::default();
    if let Some(v) = cfg.paths.config_file.clone() {
        gather.config_file = v;
    }
    if let Some(v) = cfg.paths.env_file.clone() {
        gather.env_file = v;
    }
    if let Some(v) = cfg.paths.workspace_dir.clone() {
        gather.workspace_dir = v;
    }
    if let Some(v) = cfg.runtime.docker_bin.clone() {
        gather.docker_bin = v;
    }
    if let Some(v) = cfg.runtime.gateway_container.clone() {
        gather.gateway_container = v;
    }
    if let Some(v) = cfg.runtime.sandbox_container.clone() {
        gather.sandbox_container = v;
    }
    if let Some(v) = overrides.sandbox_enabled.or(cfg.runtime.sandbox_enabled) {
        gather.sandbox_enabled = v;
    }
    if !cfg.runtime.probe_command.is_empty() {
        gather.probe_command = cfg.runtime.probe_command.clone();
    }
    if !cfg.runtime.audit_command.is_empty() {
        gather.audit_command = cfg.runtime.audit_command.clone();
    }

    Ok(ResolvedConfig { effective, gather })
}

fn parse_mode(v: &str) -> anyhow::Result<u32> {
    let bits = u32::from_str_radix(v, 8)
        .with_context(|| format!("invalid octal mode: {v} (expected e.g. '700')"))?;
    if bits > 0o7777 {
        anyhow::bail!("mode out of range: {v} (expected at most 7777)");
    }
    Ok(bits)
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "fail" => Ok(FailOn::Fail),
        "warn" | "warning" => Ok(FailOn::Warn),
        other => anyhow::bail!("unknown fail_on: {other} (expected 'fail' or 'warn')"),
    }
}
