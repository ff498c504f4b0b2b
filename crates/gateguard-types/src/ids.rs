//! Stable identifiers for checks and result codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks: filesystem permissions
pub const CHECK_FS_STATE_DIR_MODE: &str = "fs.state_dir_mode";
pub const CHECK_FS_CONFIG_FILE_MODE: &str = "fs.config_file_mode";
pub const CHECK_FS_WORKSPACE_DIR_MODE: &str = "fs.workspace_dir_mode";
pub const CHECK_FS_ENV_FILE_MODE: &str = "fs.env_file_mode";

// Checks: gateway configuration values
pub const CHECK_CONFIG_AUTH_MODE: &str = "config.auth_mode";
pub const CHECK_CONFIG_TOKEN_STRENGTH: &str = "config.token_strength";
pub const CHECK_CONFIG_DM_POLICY: &str = "config.dm_policy";
pub const CHECK_CONFIG_ALLOW_LIST: &str = "config.allow_list";
pub const CHECK_CONFIG_GROUP_POLICY: &str = "config.group_policy";
pub const CHECK_CONFIG_FS_WORKSPACE_ONLY: &str = "config.fs_workspace_only";
pub const CHECK_CONFIG_PATCH_WORKSPACE_ONLY: &str = "config.patch_workspace_only";
pub const CHECK_CONFIG_LOG_REDACTION: &str = "config.log_redaction";

// Checks: live container runtime
pub const CHECK_RUNTIME_GATEWAY_RUNNING: &str = "runtime.gateway_running";
pub const CHECK_RUNTIME_NON_ROOT_USER: &str = "runtime.non_root_user";
pub const CHECK_RUNTIME_CAPS_DROPPED: &str = "runtime.caps_dropped";
pub const CHECK_RUNTIME_NO_SENSITIVE_MOUNTS: &str = "runtime.no_sensitive_mounts";
pub const CHECK_RUNTIME_READONLY_ROOTFS: &str = "runtime.readonly_rootfs";
pub const CHECK_RUNTIME_LOOPBACK_BIND: &str = "runtime.loopback_bind";
pub const CHECK_RUNTIME_SANDBOX_RUNNING: &str = "runtime.sandbox_running";
pub const CHECK_RUNTIME_SANDBOX_REACHABLE: &str = "runtime.sandbox_reachable";
pub const CHECK_RUNTIME_SECURITY_AUDIT: &str = "runtime.security_audit";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";

// Codes: shared
pub const CODE_OK: &str = "ok";
pub const CODE_VALUE_MISSING: &str = "value_missing";
pub const CODE_VALUE_MISMATCH: &str = "value_mismatch";
pub const CODE_FACT_UNAVAILABLE: &str = "fact_unavailable";
pub const CODE_CHECK_ERROR: &str = "check_error";

// Codes: fs.*
pub const CODE_PATH_MISSING: &str = "path_missing";
pub const CODE_MODE_MISMATCH: &str = "mode_mismatch";

// Codes: config.*
pub const CODE_CONFIG_UNAVAILABLE: &str = "config_unavailable";
pub const CODE_WEAK_TOKEN: &str = "weak_token";
pub const CODE_EMPTY_ALLOW_LIST: &str = "empty_allow_list";
pub const CODE_WILDCARD_ENTRY: &str = "wildcard_entry";

// Codes: runtime.*
pub const CODE_NOT_RUNNING: &str = "not_running";
pub const CODE_ROOT_USER: &str = "root_user";
pub const CODE_CAPS_NOT_DROPPED: &str = "caps_not_dropped";
pub const CODE_SENSITIVE_MOUNT: &str = "sensitive_mount";
pub const CODE_ROOTFS_WRITABLE: &str = "rootfs_writable";
pub const CODE_PUBLIC_BIND: &str = "public_bind";
pub const CODE_PROBE_FAILED: &str = "probe_failed";
pub const CODE_CRITICAL_FINDINGS: &str = "critical_findings";
pub const CODE_SANDBOX_DISABLED: &str = "sandbox_disabled";
pub const CODE_RUNTIME_UNAVAILABLE: &str = "runtime_unavailable";

// Codes: tool.runtime
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
