//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation
//! guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration or command examples.
    pub examples: RemediationExample,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct RemediationExample {
    /// State that would trigger a failure.
    pub before: &'static str,
    /// State that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    // Try check_id first, then code
    match identifier {
        // Check IDs
        ids::CHECK_FS_STATE_DIR_MODE
        | ids::CHECK_FS_WORKSPACE_DIR_MODE => Some(explain_private_dir_mode()),
        ids::CHECK_FS_CONFIG_FILE_MODE | ids::CHECK_FS_ENV_FILE_MODE => {
            Some(explain_secret_file_mode())
        }
        ids::CHECK_CONFIG_AUTH_MODE => Some(explain_auth_mode()),
        ids::CHECK_CONFIG_TOKEN_STRENGTH => Some(explain_token_strength()),
        ids::CHECK_CONFIG_DM_POLICY => Some(explain_dm_policy()),
        ids::CHECK_CONFIG_ALLOW_LIST => Some(explain_allow_list()),
        ids::CHECK_CONFIG_GROUP_POLICY => Some(explain_group_policy()),
        ids::CHECK_CONFIG_FS_WORKSPACE_ONLY | ids::CHECK_CONFIG_PATCH_WORKSPACE_ONLY => {
            Some(explain_workspace_only())
        }
        ids::CHECK_CONFIG_LOG_REDACTION => Some(explain_log_redaction()),
        ids::CHECK_RUNTIME_GATEWAY_RUNNING => Some(explain_gateway_running()),
        ids::CHECK_RUNTIME_NON_ROOT_USER => Some(explain_non_root_user()),
        ids::CHECK_RUNTIME_CAPS_DROPPED => Some(explain_caps_dropped()),
        ids::CHECK_RUNTIME_NO_SENSITIVE_MOUNTS => Some(explain_no_sensitive_mounts()),
        ids::CHECK_RUNTIME_READONLY_ROOTFS => Some(explain_readonly_rootfs()),
        ids::CHECK_RUNTIME_LOOPBACK_BIND => Some(explain_loopback_bind()),
        ids::CHECK_RUNTIME_SANDBOX_RUNNING => Some(explain_sandbox_running()),
        ids::CHECK_RUNTIME_SANDBOX_REACHABLE => Some(explain_sandbox_reachable()),
        ids::CHECK_RUNTIME_SECURITY_AUDIT => Some(explain_security_audit()),
        ids::CHECK_TOOL_RUNTIME => Some(explain_tool_runtime()),

        // Codes
        ids::CODE_PATH_MISSING | ids::CODE_MODE_MISMATCH => Some(explain_secret_file_mode()),
        ids::CODE_CONFIG_UNAVAILABLE => Some(explain_config_unavailable()),
        ids::CODE_WEAK_TOKEN => Some(explain_token_strength()),
        ids::CODE_EMPTY_ALLOW_LIST | ids::CODE_WILDCARD_ENTRY => Some(explain_allow_list()),
        ids::CODE_NOT_RUNNING => Some(explain_gateway_running()),
        ids::CODE_ROOT_USER => Some(explain_non_root_user()),
        ids::CODE_CAPS_NOT_DROPPED => Some(explain_caps_dropped()),
        ids::CODE_SENSITIVE_MOUNT => Some(explain_no_sensitive_mounts()),
        ids::CODE_ROOTFS_WRITABLE => Some(explain_readonly_rootfs()),
        ids::CODE_PUBLIC_BIND => Some(explain_loopback_bind()),
        ids::CODE_PROBE_FAILED => Some(explain_sandbox_reachable()),
        ids::CODE_CRITICAL_FINDINGS => Some(explain_security_audit()),
        ids::CODE_SANDBOX_DISABLED | ids::CODE_RUNTIME_UNAVAILABLE => {
            Some(explain_sandbox_running())
        }
        ids::CODE_FACT_UNAVAILABLE | ids::CODE_CHECK_ERROR | ids::CODE_RUNTIME_ERROR => {
            Some(explain_tool_runtime())
        }
        ids::CODE_VALUE_MISSING | ids::CODE_VALUE_MISMATCH => Some(explain_config_unavailable()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
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
        ids::CHECK_RUNTIME_GATEWAY_RUNNING,
        ids::CHECK_RUNTIME_NON_ROOT_USER,
        ids::CHECK_RUNTIME_CAPS_DROPPED,
        ids::CHECK_RUNTIME_NO_SENSITIVE_MOUNTS,
        ids::CHECK_RUNTIME_READONLY_ROOTFS,
        ids::CHECK_RUNTIME_LOOPBACK_BIND,
        ids::CHECK_RUNTIME_SANDBOX_RUNNING,
        ids::CHECK_RUNTIME_SANDBOX_REACHABLE,
        ids::CHECK_RUNTIME_SECURITY_AUDIT,
        ids::CHECK_TOOL_RUNTIME,
    ]
}

/// List all known codes with remediation entries (`ok` needs none).
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_VALUE_MISSING,
        ids::CODE_VALUE_MISMATCH,
        ids::CODE_FACT_UNAVAILABLE,
        ids::CODE_CHECK_ERROR,
        ids::CODE_PATH_MISSING,
        ids::CODE_MODE_MISMATCH,
        ids::CODE_CONFIG_UNAVAILABLE,
        ids::CODE_WEAK_TOKEN,
        ids::CODE_EMPTY_ALLOW_LIST,
        ids::CODE_WILDCARD_ENTRY,
        ids::CODE_NOT_RUNNING,
        ids::CODE_ROOT_USER,
        ids::CODE_CAPS_NOT_DROPPED,
        ids::CODE_SENSITIVE_MOUNT,
        ids::CODE_ROOTFS_WRITABLE,
        ids::CODE_PUBLIC_BIND,
        ids::CODE_PROBE_FAILED,
        ids::CODE_CRITICAL_FINDINGS,
        ids::CODE_SANDBOX_DISABLED,
        ids::CODE_RUNTIME_UNAVAILABLE,
        ids::CODE_RUNTIME_ERROR,
    ]
}

// --- Filesystem checks ---

fn explain_private_dir_mode() -> Explanation {
    Explanation {
        title: "Private Directory Permissions",
        description: "\
The gateway state directory and the agent workspace hold session transcripts,
credentials, and working files. Group- or world-accessible bits let any local
user read them.

The check compares the directory's permission bits against the expected octal
value (default 700) and fails on any difference or on a missing path.",
        remediation: "\
Restore owner-only access:

    chmod 700 ~/.gateway
    chmod 700 ~/.gateway/workspace

If the path is missing entirely, re-run the setup flow that provisions the
state directory before verifying.",
        examples: RemediationExample {
            before: "drwxr-xr-x  ~/.gateway",
            after: "drwx------  ~/.gateway",
        },
    }
}

fn explain_secret_file_mode() -> Explanation {
    Explanation {
        title: "Secret File Permissions",
        description: "\
The gateway configuration file and the env file contain the auth token and
channel credentials in plaintext. Anything wider than owner read/write
(default 600) exposes secrets to other local users.",
        remediation: "\
Restore owner-only access:

    chmod 600 ~/.gateway/gateway.json
    chmod 600 ~/.gateway/.env",
        examples: RemediationExample {
            before: "-rw-r--r--  gateway.json",
            after: "-rw-------  gateway.json",
        },
    }
}

// --- Configuration checks ---

fn explain_config_unavailable() -> Explanation {
    Explanation {
        title: "Gateway Configuration Readable",
        description: "\
Every configuration check reads one field from the gateway's JSON document.
When the document is missing, unreadable, or not valid JSON, each of those
checks fails closed rather than assuming a safe value.",
        remediation: "\
Make sure the configuration file exists at the expected location inside the
state directory and parses as JSON, then re-run the verification.",
        examples: RemediationExample {
            before: "cat: ~/.gateway/gateway.json: No such file or directory",
            after: "{ \"gateway\": { \"auth\": { \"mode\": \"token\" } } }",
        },
    }
}

fn explain_auth_mode() -> Explanation {
    Explanation {
        title: "Token Authentication Enabled",
        description: "\
The gateway's control port accepts WebSocket connections from local clients.
Without token auth, any process that can reach the port can drive the agent.

The check requires `gateway.auth.mode` to equal the expected mode (`token`).",
        remediation: "\
Enable token authentication in the gateway configuration and restart the
service.",
        examples: RemediationExample {
            before: "\"auth\": { \"mode\": \"none\" }",
            after: "\"auth\": { \"mode\": \"token\", \"token\": \"<32+ chars>\" }",
        },
    }
}

fn explain_token_strength() -> Explanation {
    Explanation {
        title: "Auth Token Strength",
        description: "\
A short token can be brute-forced by a local attacker who can reach the
gateway port. The check requires `gateway.auth.token` to be present and at
least the configured minimum length (default 32 characters).",
        remediation: "\
Generate a long random token and place it in the configuration:

    openssl rand -hex 32",
        examples: RemediationExample {
            before: "\"token\": \"hunter2\"",
            after: "\"token\": \"$(openssl rand -hex 32)\"",
        },
    }
}

fn explain_dm_policy() -> Explanation {
    Explanation {
        title: "Direct Message Policy",
        description: "\
`channels.telegram.dmPolicy` controls who may open a direct conversation with
the agent. Anything other than the expected allow-list policy lets unknown
senders reach the agent.",
        remediation: "Set the DM policy to `allowlist` and enumerate trusted sender IDs.",
        examples: RemediationExample {
            before: "\"dmPolicy\": \"open\"",
            after: "\"dmPolicy\": \"allowlist\"",
        },
    }
}

fn explain_allow_list() -> Explanation {
    Explanation {
        title: "Sender Allow-List Populated",
        description: "\
An allow-list DM policy is only effective when `channels.telegram.allowFrom`
is non-empty and free of wildcard entries. Two conditions must both hold to
pass:
- the list contains at least one sender ID
- no entry is the wildcard literal `*`

An empty list silently rejects everyone (a likely setup mistake); a wildcard
entry silently accepts everyone.",
        remediation: "\
List the numeric sender IDs that should be allowed to start conversations,
and remove any `*` entry.",
        examples: RemediationExample {
            before: "\"allowFrom\": [\"*\"]",
            after: "\"allowFrom\": [\"123456789\"]",
        },
    }
}

fn explain_group_policy() -> Explanation {
    Explanation {
        title: "Group Chat Policy",
        description: "\
`channels.telegram.groupPolicy` controls whether the agent responds inside
group chats, where membership is not under the operator's control. The check
requires the expected value (`disabled`).",
        remediation: "Disable group handling unless every group member is trusted.",
        examples: RemediationExample {
            before: "\"groupPolicy\": \"open\"",
            after: "\"groupPolicy\": \"disabled\"",
        },
    }
}

fn explain_workspace_only() -> Explanation {
    Explanation {
        title: "Workspace Confinement",
        description: "\
`tools.fs.workspaceOnly` and `tools.exec.applyPatch.workspaceOnly` confine the
agent's file tools and patch application to the workspace directory. With
either flag off, a prompt-injected agent can read or write arbitrary paths in
the container.",
        remediation: "Set both workspaceOnly flags to true.",
        examples: RemediationExample {
            before: "\"fs\": { \"workspaceOnly\": false }",
            after: "\"fs\": { \"workspaceOnly\": true }",
        },
    }
}

fn explain_log_redaction() -> Explanation {
    Explanation {
        title: "Sensitive Log Redaction",
        description: "\
`logging.redactSensitive` controls whether tool inputs/outputs are scrubbed
of secrets before being written to the session log. The check requires one of
the accepted values (default `tools` or `all`).",
        remediation: "Enable redaction for at least tool traffic.",
        examples: RemediationExample {
            before: "\"redactSensitive\": \"off\"",
            after: "\"redactSensitive\": \"tools\"",
        },
    }
}

// --- Runtime checks ---

fn explain_gateway_running() -> Explanation {
    Explanation {
        title: "Gateway Container Running",
        description: "\
Verifies via container inspection that the gateway service is up. Inability to
obtain the fact (tool missing, inspect error) fails closed.",
        remediation: "Start the deployment, e.g. `docker compose up -d`, then re-run.",
        examples: RemediationExample {
            before: "docker inspect gateway -> Error: No such object",
            after: "docker inspect gateway -> \"Running\": true",
        },
    }
}

fn explain_non_root_user() -> Explanation {
    Explanation {
        title: "Non-Root Container User",
        description: "\
Checks the effective numeric uid inside the gateway container. Running as
uid 0 defeats most of the container hardening: a compromised agent process
would hold root inside the container.",
        remediation: "\
Set a non-root `user:` in the compose service definition (for example
`user: \"1000:1000\"`) and make the state volume writable by that uid.",
        examples: RemediationExample {
            before: "docker exec gateway id -u  ->  0",
            after: "docker exec gateway id -u  ->  1000",
        },
    }
}

fn explain_caps_dropped() -> Explanation {
    Explanation {
        title: "Linux Capabilities Dropped",
        description: "\
Checks that the container's dropped-capability set includes `ALL`. Retained
capabilities (NET_RAW, SYS_ADMIN, ...) widen the kernel attack surface
available to a compromised process.",
        remediation: "Add `cap_drop: [ALL]` to the service definition.",
        examples: RemediationExample {
            before: "cap_drop: []",
            after: "cap_drop:\n  - ALL",
        },
    }
}

fn explain_no_sensitive_mounts() -> Explanation {
    Explanation {
        title: "No Sensitive Host Mounts",
        description: "\
Inspects the container's mount list for forbidden host sources: the container
runtime socket (full host takeover), `/etc`, and home directories. Any match
fails the check.",
        remediation: "\
Remove the offending volume from the compose file. The gateway only needs its
own state directory and the workspace.",
        examples: RemediationExample {
            before: "volumes:\n  - /var/run/docker.sock:/var/run/docker.sock",
            after: "volumes:\n  - gateway-state:/data",
        },
    }
}

fn explain_readonly_rootfs() -> Explanation {
    Explanation {
        title: "Read-Only Root Filesystem",
        description: "\
Checks the container's ReadonlyRootfs flag. A writable root filesystem lets a
compromised process persist implants across restarts.",
        remediation: "Set `read_only: true` and mount tmpfs for scratch paths that need writes.",
        examples: RemediationExample {
            before: "read_only: false",
            after: "read_only: true\ntmpfs:\n  - /tmp",
        },
    }
}

fn explain_loopback_bind() -> Explanation {
    Explanation {
        title: "Loopback-Only Port Binding",
        description: "\
Checks each published port's host bind address. A bind to 0.0.0.0 (or an
empty HostIp, which means the same) exposes the gateway control port to the
network; only loopback addresses are accepted.",
        remediation: "Prefix the port mapping with the loopback address.",
        examples: RemediationExample {
            before: "ports:\n  - \"8790:8790\"",
            after: "ports:\n  - \"127.0.0.1:8790:8790\"",
        },
    }
}

fn explain_sandbox_running() -> Explanation {
    Explanation {
        title: "Sandbox Container Running",
        description: "\
When the deployment uses the optional sandbox service for tool execution, this
verifies it is up. The check is skipped when the sandbox is disabled by the
deployment mode, and degrades to a warning when the runtime cannot be
queried (the service is optional, so unavailability is not a hard failure).",
        remediation: "Start the sandbox service, or disable sandbox mode in gateguard.toml if the deployment does not use one.",
        examples: RemediationExample {
            before: "docker inspect sandbox -> Error: No such object",
            after: "docker inspect sandbox -> \"Running\": true",
        },
    }
}

fn explain_sandbox_reachable() -> Explanation {
    Explanation {
        title: "Sandbox to Gateway Reachability",
        description: "\
Runs a probe command inside the sandbox container against the gateway's
service address, verifying the two services share a network. A failing probe
means tool execution would break at runtime even though both containers are
up.",
        remediation: "\
Put both services on the same compose network and make sure the gateway's
service name resolves from the sandbox.",
        examples: RemediationExample {
            before: "docker exec sandbox curl -fsS http://gateway:8790/health  ->  exit 7",
            after: "docker exec sandbox curl -fsS http://gateway:8790/health  ->  ok",
        },
    }
}

fn explain_security_audit() -> Explanation {
    Explanation {
        title: "Delegated Security Audit Clean",
        description: "\
Invokes the gateway's own `security audit --json` inside the running
container and reads the `summary.critical` field. Any critical finding from
the application's self-audit fails the check; inability to run or parse the
audit fails closed.",
        remediation: "\
Run the audit directly for the full finding list and address each critical
item:

    docker exec gateway gateway security audit",
        examples: RemediationExample {
            before: "\"summary\": { \"critical\": 2 }",
            after: "\"summary\": { \"critical\": 0 }",
        },
    }
}

fn explain_tool_runtime() -> Explanation {
    Explanation {
        title: "Verifier Runtime",
        description: "\
Codes in this family mark degraded verification rather than an observed bad
posture: a check's own evaluation errored, a fact could not be gathered, or
the run as a whole hit an orchestration error. They still surface as failures
because posture could not be confirmed (fail-closed).",
        remediation: "\
Read the attached detail: it carries the underlying command or IO error.
Typical causes are a missing container tool or a stopped deployment.",
        examples: RemediationExample {
            before: "docker: command not found",
            after: "docker inspect gateway -> \"Running\": true",
        },
    }
}
