use std::collections::BTreeMap;

/// When the run counts as failed for exit-code purposes.
///
/// `Fail` is the contract default: only Fail outcomes fail the run. `Warn`
/// widens that for stricter CI gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Fail,
    Warn,
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
}

impl CheckPolicy {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Expected posture values the checks compare against.
#[derive(Clone, Debug)]
pub struct Expectations {
    /// Expected permission bits per path class.
    pub state_dir_mode: u32,
    pub config_file_mode: u32,
    pub workspace_dir_mode: u32,
    pub env_file_mode: u32,

    pub auth_mode: String,
    pub min_token_length: usize,
    pub dm_policy: String,
    pub group_policy: String,
    /// Accepted values for `logging.redactSensitive`.
    pub redact_sensitive: Vec<String>,

    /// Host paths that must not appear as mount sources (matched exactly or
    /// as a path prefix).
    pub forbidden_mount_sources: Vec<String>,
    /// Host addresses accepted as loopback binds.
    pub loopback_hosts: Vec<String>,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            state_dir_mode: 0o700,
            config_file_mode: 0o600,
            workspace_dir_mode: 0o700,
            env_file_mode: 0o600,
            auth_mode: "token".to_string(),
            min_token_length: 32,
            dm_policy: "allowlist".to_string(),
            group_policy: "disabled".to_string(),
            redact_sensitive: vec!["tools".to_string(), "all".to_string()],
            forbidden_mount_sources: vec![
                "/var/run/docker.sock".to_string(),
                "/run/docker.sock".to_string(),
                "/etc".to_string(),
                "/root".to_string(),
                "/home".to_string(),
            ],
            loopback_hosts: vec![
                "127.0.0.1".to_string(),
                "::1".to_string(),
                "localhost".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub expect: Expectations,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }

    /// Whether any live-environment check is enabled (drives whether runtime
    /// facts get gathered at all).
    pub fn runtime_checks_enabled(&self) -> bool {
        self.checks
            .iter()
            .any(|(id, p)| p.enabled && id.starts_with("runtime."))
    }
}
