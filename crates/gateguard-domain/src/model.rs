//! The posture model: every externally gathered fact the checks consume.
//!
//! Facts are gathered once, before evaluation. A fact that could not be
//! obtained is carried as `Unavailable(reason)` instead of aborting the run,
//! so checks can fail closed individually and the report stays complete.

use serde::{Deserialize, Deserializer};

/// One gathered fact. `Unavailable` carries the gathering failure as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fact<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Fact<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Fact::Unavailable(reason.into())
    }

    pub fn as_available(&self) -> Option<&T> {
        match self {
            Fact::Available(v) => Some(v),
            Fact::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Fact::Available(_) => None,
            Fact::Unavailable(r) => Some(r),
        }
    }
}

impl<T> Default for Fact<T> {
    fn default() -> Self {
        Fact::Unavailable("not gathered".to_string())
    }
}

/// Permission probe for one path. `mode` is the permission bits
/// (`st_mode & 0o7777`); `None` means the path is missing or unreadable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathProbe {
    pub path: String,
    pub mode: Option<u32>,
}

/// The four path classes whose permissions are verified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FsModel {
    pub state_dir: PathProbe,
    pub config_file: PathProbe,
    pub workspace_dir: PathProbe,
    pub env_file: PathProbe,
}

/// The gateway's JSON configuration document, reduced to the fields the
/// checks read. Permissive: absent sections deserialize to defaults so a
/// partial document still produces per-field failures instead of a parse
/// error.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayDoc {
    pub gateway: GatewaySection,
    pub channels: ChannelsSection,
    pub tools: ToolsSection,
    pub logging: LoggingSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewaySection {
    pub auth: AuthSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthSection {
    pub mode: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelsSection {
    pub telegram: TelegramSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelegramSection {
    pub dm_policy: Option<String>,
    /// Sender IDs appear as strings or numbers in the wild; both are accepted
    /// and normalized to strings.
    #[serde(deserialize_with = "string_or_number_seq")]
    pub allow_from: Vec<String>,
    pub group_policy: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsSection {
    pub fs: FsToolSection,
    pub exec: ExecSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsToolSection {
    pub workspace_only: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecSection {
    pub apply_patch: ApplyPatchSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyPatchSection {
    pub workspace_only: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingSection {
    pub redact_sensitive: Option<String>,
}

fn string_or_number_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let mut out = Vec::with_capacity(raw.len());
    for v in raw {
        match v {
            serde_json::Value::String(s) => out.push(s),
            serde_json::Value::Number(n) => out.push(n.to_string()),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "allowFrom entries must be strings or numbers, got {other}"
                )));
            }
        }
    }
    Ok(out)
}

/// One container mount, as reported by runtime inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mount {
    pub source: String,
    pub destination: String,
}

/// One published port binding. An empty `host_ip` means "all interfaces".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortBinding {
    pub container_port: String,
    pub host_ip: String,
    pub host_port: String,
}

/// Summary of the gateway's delegated in-container security audit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub critical: u64,
}

/// Facts about the gateway service container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GatewayRuntime {
    pub running: Fact<bool>,
    /// Effective numeric uid inside the container.
    pub uid: Fact<u32>,
    pub cap_drop: Fact<Vec<String>>,
    pub mounts: Fact<Vec<Mount>>,
    pub readonly_rootfs: Fact<bool>,
    pub port_bindings: Fact<Vec<PortBinding>>,
    pub audit: Fact<AuditSummary>,
}

/// Facts about the optional sandbox service container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SandboxRuntime {
    /// Whether the deployment mode includes a sandbox service at all.
    /// When false, sandbox-scoped checks resolve to Skip.
    pub enabled: bool,
    pub running: Fact<bool>,
    pub gateway_reachable: Fact<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeModel {
    pub gateway: GatewayRuntime,
    pub sandbox: SandboxRuntime,
}

/// Everything the check catalog evaluates against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostureModel {
    pub fs: FsModel,
    pub config: Fact<GatewayDoc>,
    pub runtime: RuntimeModel,
}
