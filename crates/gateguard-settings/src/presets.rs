use gateguard_domain::policy::{CheckPolicy, EffectiveConfig, Expectations, FailOn};
use gateguard_types::ids;
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything deployment-specific should go into
/// repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "config-only" => config_only_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Fail,
        expect: Expectations::default(),
        checks: default_checks(true),
    }
}

/// Pre-deployment validation: verify the state directory and the gateway
/// document without touching the container runtime.
fn config_only_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "config-only".to_string(),
        fail_on: FailOn::Fail,
        expect: Expectations::default(),
        checks: default_checks(false),
    }
}

fn default_checks(runtime_enabled: bool) -> BTreeMap<String, CheckPolicy> {
    let mut m = BTreeMap::new();

    for id in [
        ids::CHECK_FS_STATE_DIR_MODE,
        ids::CHECK_FS_CONFIG_FILE_MODE,
        ids::CHECK_FS_WORKSPACE_DIR_MODE,
        ids::CHECK_FS_ENV_FILE_MODE,
        ids::CHECK_CONFIG_AUTH_MODE,
        ids::CHECK_CONFIG_TOKEN_STRENGTH,
        ids::CHECK_CONFIG_DM_POLICY,
        ids::CHECK_CONFIG_ALLOW_LIST,
        ids::CHECK_CONFIG_GROUP_POLICY,
        ids::CHECK_CONFIG_FS_WORKSPACE_ONLY,
        ids::CHECK_CONFIG_PATCH_WORKSPACE_ONLY,
        ids::CHECK_CONFIG_LOG_REDACTION,
    ] {
        m.insert(id.to_string(), CheckPolicy::enabled());
    }

    for id in [
        ids::CHECK_RUNTIME_GATEWAY_RUNNING,
        ids::CHECK_RUNTIME_NON_ROOT_USER,
        ids::CHECK_RUNTIME_CAPS_DROPPED,
        ids::CHECK_RUNTIME_NO_SENSITIVE_MOUNTS,
        ids::CHECK_RUNTIME_READONLY_ROOTFS,
        ids::CHECK_RUNTIME_LOOPBACK_BIND,
        ids::CHECK_RUNTIME_SANDBOX_RUNNING,
        ids::CHECK_RUNTIME_SANDBOX_REACHABLE,
        ids::CHECK_RUNTIME_SECURITY_AUDIT,
    ] {
        let policy = if runtime_enabled {
            CheckPolicy::enabled()
        } else {
            CheckPolicy::disabled()
        };
        m.insert(id.to_string(), policy);
    }

    m
}
