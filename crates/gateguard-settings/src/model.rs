use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `gateguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GateguardConfigV1 {
    /// Optional schema string for tooling (`gateguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the run: `fail` (default) or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub gateway: GatewayExpectConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

/// File names inside the state directory and expected permission bits per
/// path class. Modes are octal strings (`"700"`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_dir_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file_mode: Option<String>,
}

/// Expected gateway configuration values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GatewayExpectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_token_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_policy: Option<String>,

    /// Accepted values for `logging.redactSensitive`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redact_sensitive: Vec<String>,
}

/// Container runtime wiring and expectations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuntimeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_bin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_container: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_container: Option<String>,

    /// Whether the deployment mode includes the optional sandbox service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_mount_sources: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loopback_hosts: Vec<String>,

    /// Argv run inside the sandbox to probe the gateway.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probe_command: Vec<String>,

    /// Argv run inside the gateway for the delegated security audit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_command: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}
